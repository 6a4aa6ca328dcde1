use anyhow::Result;
use apery_graph::AnalysisError;
use apery_protocol::ErrorEnvelope;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Analyze,
    AperySet,
    Graph,
    Explain,
    Capabilities,
}

impl CommandAction {
    pub const ALL: [CommandAction; 5] = [
        CommandAction::Analyze,
        CommandAction::AperySet,
        CommandAction::Graph,
        CommandAction::Explain,
        CommandAction::Capabilities,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::Analyze => "analyze",
            CommandAction::AperySet => "apery_set",
            CommandAction::Graph => "graph",
            CommandAction::Explain => "explain",
            CommandAction::Capabilities => "capabilities",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AnalyzePayload {
    pub generators: Vec<i64>,
    #[serde(default)]
    pub closure_bound: Option<u64>,
    #[serde(default)]
    pub include_connectivity: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct GeneratorsPayload {
    pub generators: Vec<i64>,
    #[serde(default)]
    pub closure_bound: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ExplainPayload {
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    pub data: Value,
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closure_bound: Option<u64>,
}

#[derive(Debug)]
pub struct CommandOutcome {
    pub data: Value,
    pub meta: ResponseMeta,
}

impl CommandOutcome {
    pub fn from_value<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            meta: ResponseMeta::default(),
        })
    }
}

/// Failures raised by the adapter itself, before the core runs.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Apéry modulus {modulus} exceeds the configured limit of {limit}")]
    TooLarge { modulus: u64, limit: u64 },
}

pub fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|err| RequestError::Invalid(err.to_string()).into())
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub code: String,
    pub hint: Option<String>,
}

pub fn classify_error(err: &anyhow::Error) -> ErrorClassification {
    if let Some(err) = err.downcast_ref::<AnalysisError>() {
        let hint = match err {
            AnalysisError::InvalidInput(_) => {
                "Pass a non-empty list of positive integers, e.g. {\"generators\": [3, 5]}."
            }
            AnalysisError::IncompleteClosure { .. } => {
                "Some residue class has no member below the closure bound. Generators with a common factor never fill every class; otherwise raise closure_bound."
            }
            AnalysisError::SearchExhausted { .. } => {
                "No secure set was found; this indicates a defect, please report the generators."
            }
            AnalysisError::GraphTooLarge { .. } => {
                "The exact search addresses at most 64 vertices; choose a smaller smallest generator."
            }
        };
        return ErrorClassification {
            code: err.kind().to_string(),
            hint: Some(hint.to_string()),
        };
    }

    if let Some(err) = err.downcast_ref::<RequestError>() {
        return match err {
            RequestError::Invalid(_) => ErrorClassification {
                code: "invalid_request".to_string(),
                hint: Some(
                    "Verify the request is valid JSON and matches the Command API schema."
                        .to_string(),
                ),
            },
            RequestError::TooLarge { .. } => ErrorClassification {
                code: "too_large".to_string(),
                hint: Some(
                    "Graph size grows with the square of the modulus and search time exponentially. Raise max_modulus (APERY_MAX_MODULUS) to accept that cost."
                        .to_string(),
                ),
            },
        };
    }

    ErrorClassification {
        code: "internal".to_string(),
        hint: None,
    }
}

pub fn error_envelope(err: &anyhow::Error) -> ErrorEnvelope {
    let classification = classify_error(err);
    ErrorEnvelope {
        code: classification.code,
        message: format!("{err:#}"),
        hint: classification.hint,
    }
}
