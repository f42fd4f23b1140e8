use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoriesError>;

#[derive(Debug, Clone, Error)]
pub enum StoriesError {
    /// Rejected before any I/O
    #[error("{0}")]
    InvalidArgument(String),

    /// Non-success status, network failure or undecodable payload from the remote
    #[error("Hacker News request failed: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Operation was cancelled")]
    Cancelled,

    /// A fan-out task panicked or was aborted outside of cancellation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoriesError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// HTTP status to report for this error at the request boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::Transport { status, .. } => status.unwrap_or(502),
            Self::Cancelled => 503,
            Self::Internal(_) => 500,
        }
    }
}

impl From<reqwest::Error> for StoriesError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
