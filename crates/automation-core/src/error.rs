use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("screen not found: {0}")]
    ScreenNotFound(String),

    #[error("malformed backend response: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AutomationError>;
