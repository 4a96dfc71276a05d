use thiserror::Error;

/// Failure of a single user-initiated operation. Every variant is terminal for
/// the operation that produced it; nothing is retried automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any remote call was made.
    #[error("{0}")]
    Validation(String),
    #[error("request failed{}: {message}", http_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },
    /// The service answered with `success: false`.
    #[error("service error: {0}")]
    Semantic(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

fn http_suffix(status: &Option<u16>) -> String {
    status
        .map(|status| format!(" with HTTP {status}"))
        .unwrap_or_default()
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn semantic(error: Option<String>) -> Self {
        Self::Semantic(
            error
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| "unknown error".to_string()),
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Transport {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}
