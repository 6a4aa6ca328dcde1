use anyhow::{Context as AnyhowContext, Result};
use std::net::SocketAddr;

pub(crate) const AUTH_TOKEN_ENV: &str = "APERY_AUTH_TOKEN";

/// Bearer token required on every HTTP request when configured.
#[derive(Clone, Debug)]
pub(crate) struct AuthToken {
    token: String,
}

impl AuthToken {
    pub(crate) fn parse(raw: Option<&str>) -> Result<Option<Self>> {
        let Some(raw) = raw else {
            return Ok(None);
        };

        let token = raw.trim();
        if token.is_empty() {
            anyhow::bail!("auth token must be non-empty")
        }

        Ok(Some(Self {
            token: token.to_string(),
        }))
    }

    /// Accepts `Bearer <token>` only.
    pub(crate) fn accepts(&self, header_value: &str) -> bool {
        header_value
            .trim()
            .strip_prefix("Bearer ")
            .is_some_and(|presented| same_bytes(presented.trim().as_bytes(), self.token.as_bytes()))
    }
}

/// Where the server may listen and which token, if any, guards it.
#[derive(Debug)]
pub(crate) struct ServerAccess {
    pub addrs: Vec<SocketAddr>,
    pub token: Option<AuthToken>,
}

/// Resolve the bind address and enforce the exposure rules: non-loopback
/// addresses need `public`, and `public` needs a token.
pub(crate) async fn resolve_access(
    bind: &str,
    public: bool,
    token: Option<&str>,
) -> Result<ServerAccess> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(bind)
        .await
        .with_context(|| format!("Failed to resolve bind address: {bind}"))?
        .collect();
    if addrs.is_empty() {
        anyhow::bail!("Bind address resolved to zero socket addrs: {bind}")
    }

    if !public && addrs.iter().any(|addr| !addr.ip().is_loopback()) {
        anyhow::bail!(
            "Refusing to bind to non-loopback address without --public: {bind}. To expose the server, pass --public and set {AUTH_TOKEN_ENV} (or --auth-token)."
        )
    }

    let token = AuthToken::parse(token)?;
    if public && token.is_none() {
        anyhow::bail!("--public requires an auth token: set --auth-token or export {AUTH_TOKEN_ENV}");
    }

    Ok(ServerAccess { addrs, token })
}

/// Length-checked comparison that inspects every byte regardless of where
/// the first mismatch is.
fn same_bytes(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_matching() {
        let token = AuthToken::parse(Some("  secret  ")).unwrap().unwrap();
        assert!(token.accepts("Bearer secret"));
        assert!(token.accepts("Bearer  secret  "));
        assert!(!token.accepts("secret"));
        assert!(!token.accepts("Bearer wrong"));
        assert!(!token.accepts("Bearer secre"));
        assert!(AuthToken::parse(Some("   ")).is_err());
        assert!(AuthToken::parse(None).unwrap().is_none());
    }

    #[tokio::test]
    async fn exposure_rules() {
        let local = resolve_access("127.0.0.1:0", false, None).await.unwrap();
        assert!(local.token.is_none());

        let err = resolve_access("0.0.0.0:0", false, None).await.unwrap_err();
        assert!(err.to_string().contains("Refusing to bind"));

        let err = resolve_access("0.0.0.0:0", true, None).await.unwrap_err();
        assert!(err.to_string().contains("--public requires an auth token"));

        let public = resolve_access("0.0.0.0:0", true, Some("t0ken")).await.unwrap();
        assert!(public.token.is_some());
    }
}
