use crate::command::{CommandAction, CommandHandler, CommandRequest};
use crate::server_security::AuthToken;
use apery_protocol::{serialize_json, ErrorEnvelope};
use axum::{
    body::{Body, Bytes},
    http::{header::AUTHORIZATION, HeaderMap, Response as HttpResponse, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub(crate) struct HttpState {
    pub handler: CommandHandler,
    pub auth_token: Option<AuthToken>,
}

pub(crate) fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route(
            "/command",
            post({
                let state = state.clone();
                move |headers, body| http_command(headers, body, state.clone())
            }),
        )
        .route(
            "/analyze",
            post({
                let state = state.clone();
                move |headers, body| http_analyze(headers, body, state.clone())
            }),
        )
        .route(
            "/health",
            get({
                let state = state.clone();
                move |headers| http_health(headers, state.clone())
            }),
        )
}

fn is_authorized(headers: &HeaderMap, token: &AuthToken) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| token.accepts(value))
}

fn unauthorized() -> Result<Response, StatusCode> {
    let envelope = ErrorEnvelope {
        code: "unauthorized".to_string(),
        message: "Missing or invalid Authorization header".to_string(),
        hint: Some(
            "The server was started with an auth token; include Authorization: Bearer <token>."
                .to_string(),
        ),
    };
    build_response(StatusCode::UNAUTHORIZED, &envelope)
}

fn invalid_request(message: String) -> Result<Response, StatusCode> {
    let envelope = ErrorEnvelope {
        code: "invalid_request".to_string(),
        message,
        hint: Some("Verify the request body is valid JSON.".to_string()),
    };
    build_response(StatusCode::BAD_REQUEST, &envelope)
}

/// HTTP status for an error envelope code from [`crate::command::error_envelope`].
fn status_for_code(code: &str) -> StatusCode {
    match code {
        "invalid_input" | "invalid_request" => StatusCode::BAD_REQUEST,
        "unauthorized" => StatusCode::UNAUTHORIZED,
        "incomplete_closure" | "too_large" | "graph_too_large" => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn build_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response, StatusCode> {
    let bytes = serialize_json(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .into_bytes();

    let mut builder = HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json");

    if status == StatusCode::UNAUTHORIZED {
        builder = builder.header("www-authenticate", "Bearer");
    }

    builder
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn http_command(
    headers: HeaderMap,
    body: Bytes,
    state: Arc<HttpState>,
) -> Result<Response, StatusCode> {
    if let Some(token) = &state.auth_token {
        if !is_authorized(&headers, token) {
            return unauthorized();
        }
    }

    let request: CommandRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => return invalid_request(format!("Invalid JSON request: {err}")),
    };
    let response = state.handler.execute(request).await;
    build_response(StatusCode::OK, &response)
}

/// `POST /analyze` with the analyze payload as the body: the report on
/// success, an error envelope otherwise.
async fn http_analyze(
    headers: HeaderMap,
    body: Bytes,
    state: Arc<HttpState>,
) -> Result<Response, StatusCode> {
    if let Some(token) = &state.auth_token {
        if !is_authorized(&headers, token) {
            return unauthorized();
        }
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => return invalid_request(format!("Invalid JSON request: {err}")),
    };
    let response = state
        .handler
        .execute(CommandRequest {
            action: CommandAction::Analyze,
            payload,
        })
        .await;

    match response.error {
        Some(error) => build_response(status_for_code(&error.code), &error),
        None => build_response(StatusCode::OK, &response.data),
    }
}

async fn http_health(headers: HeaderMap, state: Arc<HttpState>) -> Result<Response, StatusCode> {
    if let Some(token) = &state.auth_token {
        if !is_authorized(&headers, token) {
            return unauthorized();
        }
    }

    let report = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    build_response(StatusCode::OK, &report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::to_bytes;
    use axum::http::HeaderValue;

    fn state(token: Option<&str>) -> Arc<HttpState> {
        Arc::new(HttpState {
            handler: CommandHandler::new(AppConfig::default()),
            auth_token: AuthToken::parse(token).unwrap(),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn analyze_returns_the_report() {
        let response = http_analyze(
            HeaderMap::new(),
            Bytes::from_static(br#"{"generators":[3,5]}"#),
            state(None),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["security_number"], 2);
        assert_eq!(body["apery_set"], serde_json::json!([0, 5, 10]));
    }

    #[tokio::test]
    async fn analyze_maps_core_errors_to_statuses() {
        let response = http_analyze(
            HeaderMap::new(),
            Bytes::from_static(br#"{"generators":[4,6]}"#),
            state(None),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], "incomplete_closure");

        let response = http_analyze(HeaderMap::new(), Bytes::from_static(b"{"), state(None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn token_is_enforced() {
        let response = http_health(HeaderMap::new(), state(Some("s3cret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("www-authenticate").unwrap(),
            "Bearer"
        );

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer s3cret"));
        let response = http_health(headers, state(Some("s3cret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn command_route_wraps_responses() {
        let response = http_command(
            HeaderMap::new(),
            Bytes::from_static(br#"{"action":"apery_set","payload":{"generators":[3,4,5]}}"#),
            state(None),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["data"]["apery_set"], serde_json::json!([0, 4, 5]));
    }
}
