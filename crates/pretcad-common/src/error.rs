use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenerError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx reply from the screening service. `detail` is the compact JSON
    /// body when it parsed, the raw text otherwise.
    #[error("status {status} / {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScreenerError {
    /// HTTP status carried by a remote rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScreenerError::Rejected { status, .. } => Some(*status),
            ScreenerError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScreenerError>;
