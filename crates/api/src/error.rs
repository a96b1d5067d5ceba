use thiserror::Error;

/// Message shown when a business failure carries no server detail.
pub const GENERIC_FAILURE_MESSAGE: &str = "Could not process registration.";
/// Message shown for transport failures; the user retries by re-triggering.
pub const NETWORK_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

/// Failure of a call against the registration backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("{call} request failed: {source}")]
    Transport {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response or `status != "success"`.
    #[error("{call} was rejected: {}", .detail.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Business {
        call: &'static str,
        http_status: Option<u16>,
        detail: Option<String>,
    },

    /// A success response whose body did not match the expected shape.
    #[error("{call} returned an unexpected body: {message}")]
    Decode { call: &'static str, message: String },
}

impl ApiError {
    /// User-facing message: server `detail` when present, else a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Business { detail: Some(detail), .. } => format!("Error: {detail}"),
            ApiError::Business { detail: None, .. } | ApiError::Decode { .. } => format!("Error: {GENERIC_FAILURE_MESSAGE}"),
            ApiError::Transport { .. } => NETWORK_FAILURE_MESSAGE.to_string(),
            ApiError::InvalidBaseUrl { .. } | ApiError::Client(_) => self.to_string(),
        }
    }

    /// Transport failures are retried by re-invoking the trigger.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}
