//! Error classification for API calls.

use thiserror::Error;

/// Errors surfaced by the API client. These are the only kinds callers
/// handle; the directory state renders them through
/// [`user_message`](ApiError::user_message).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The configured base URL or a derived request URL failed to parse.
    #[error("invalid request URL")]
    InvalidUrl,

    /// The server answered with an empty body where one was expected.
    #[error("empty response body")]
    NoData,

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decoding(String),

    /// Non-2xx status other than 401.
    #[error("server returned status {status}")]
    Server { status: u16 },

    /// Transport failure or a response that defies classification. The
    /// underlying detail goes to the log, not the type.
    #[error("unknown network error")]
    Unknown,

    #[error("email already registered")]
    EmailAlreadyTaken,

    /// 401; triggers the one-shot refresh-and-retry on user creation.
    #[error("unauthorized")]
    Unauthorized,
}

impl ApiError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        if status == 401 {
            Self::Unauthorized
        } else {
            Self::Server { status }
        }
    }

    /// Human-readable message for the directory state's error field.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl => "Invalid URL".to_owned(),
            Self::NoData => "No data received".to_owned(),
            Self::Decoding(_) => "Failed to decode response".to_owned(),
            // 422 is the API's validation rejection; surface the field hint.
            Self::Server { status: 422 } => "Email should be valid.".to_owned(),
            Self::Server { status } => format!("Server error: {status}"),
            Self::Unknown => "Unknown error occurred".to_owned(),
            Self::EmailAlreadyTaken => "Email exists".to_owned(),
            Self::Unauthorized => "Unauthorized".to_owned(),
        }
    }
}
