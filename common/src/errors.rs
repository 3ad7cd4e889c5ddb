use thiserror::Error;

/// Message shown when the provider rejects the API key.
pub const INVALID_API_KEY_MESSAGE: &str =
    "API key is invalid or still activating (takes 10-15 min)";

/// Message shown for every other fetch failure.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data";

/// Structured error types for the weather crates
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    /// The provider answered 401: the key is wrong or not yet active.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        if status == 401 {
            return Self::InvalidApiKey(message.into());
        }
        Self::HttpError {
            status,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// HTTP status carried by the error, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::HttpError { status, .. } => Some(*status),
            AppError::InvalidApiKey(_) => Some(401),
            AppError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_invalid_api_key(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether a retry could plausibly succeed: timeouts, transport failures
    /// and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::TimeoutError(_) => true,
            AppError::NetworkError(e) => e.status().is_none_or(|s| s.is_server_error()),
            AppError::HttpError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Text suitable for showing to a dashboard user.
    pub fn user_message(&self) -> &'static str {
        if self.is_invalid_api_key() {
            INVALID_API_KEY_MESSAGE
        } else {
            FETCH_FAILED_MESSAGE
        }
    }
}
