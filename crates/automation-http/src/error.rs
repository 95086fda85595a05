use automation_core::AutomationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid backend config: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<HttpError> for AutomationError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Status { status, body } => AutomationError::Backend {
                status,
                message: body,
            },
            HttpError::Request(e) if e.is_decode() => AutomationError::Decode(e.to_string()),
            other => AutomationError::Transport(other.to_string()),
        }
    }
}
