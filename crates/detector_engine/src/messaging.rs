//! Decoding of extension-style panel commands and their acknowledgements.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Description used when an inject command carries no usable text.
pub const MISSING_DESCRIPTION: &str = "No specific job description provided by message.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    Inject { job_description: String },
    ManualActivation,
    Close,
    SetLoading(bool),
    Unknown { action: Option<String> },
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("malformed command: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommand {
    action: Option<Value>,
    job_description: Option<Value>,
    is_loading: Option<Value>,
}

/// Parses one JSON command object. Unrecognised actions decode to
/// [`PanelCommand::Unknown`]; only invalid JSON is an error.
pub fn decode_command(input: &str) -> Result<PanelCommand, CommandError> {
    let raw: RawCommand = serde_json::from_str(input)?;
    let action = raw.action.as_ref().and_then(Value::as_str);
    let command = match action {
        Some("injectJobDetectorPanel" | "injectPanel") => PanelCommand::Inject {
            job_description: match raw.job_description {
                Some(Value::String(text)) => text,
                _ => MISSING_DESCRIPTION.to_string(),
            },
        },
        Some("manualActivation") => PanelCommand::ManualActivation,
        Some("closeJobDetectorPanel" | "closePanel") => PanelCommand::Close,
        Some("setJobDetectorLoading" | "setLoading") => {
            PanelCommand::SetLoading(raw.is_loading.as_ref().is_some_and(truthy))
        }
        _ => PanelCommand::Unknown {
            action: raw.action.map(|value| match value {
                Value::String(text) => text,
                other => other.to_string(),
            }),
        },
    };
    Ok(command)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reply sent back for every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_action: Option<String>,
}

impl Ack {
    fn status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            job_description: None,
            request_action: None,
        }
    }

    pub fn for_command(command: &PanelCommand) -> Self {
        match command {
            PanelCommand::Inject { job_description } => Self {
                job_description: Some(job_description.clone()),
                ..Self::status("Panel injection initiated")
            },
            PanelCommand::ManualActivation => Self::status("Manual panel activation initiated"),
            PanelCommand::Close => Self::status("Panel closed as per message"),
            PanelCommand::SetLoading(_) => {
                Self::status("Loading state update received by content script")
            }
            PanelCommand::Unknown { action } => Self {
                request_action: action.clone(),
                ..Self::status("Unknown action")
            },
        }
    }

    pub fn malformed(err: &CommandError) -> Self {
        Self::status(&format!("Malformed message: {err}"))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"status\":{:?}}}", self.status))
    }
}
