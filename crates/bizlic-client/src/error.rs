//! Service call error types.

/// Errors from calls to the licensing service.
///
/// None of these are retried. The caller surfaces
/// [`user_message`](ServiceError::user_message) and may re-invoke.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request could not be completed (connect, timeout, body read).
    #[error("HTTP error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("{endpoint} returned {status}: {message}")]
    Server {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// The response body could not be parsed; `raw` holds the body text.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        endpoint: String,
        reason: String,
        raw: String,
    },
    /// A 2xx response carried the service's explicit error marker.
    #[error("{endpoint} reported an error: {message}")]
    Rejected { endpoint: String, message: String },
    /// The question was blank; no request was sent.
    #[error("question must not be empty")]
    EmptyQuestion,
    /// Client configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ServiceError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { .. } => "Could not reach the licensing service.".into(),
            Self::Server { status, message, .. } => format!("Server error ({status}): {message}"),
            Self::MalformedResponse { .. } => {
                "The licensing service returned a response that could not be read.".into()
            }
            Self::Rejected { message, .. } => format!("The licensing service reported an error: {message}"),
            Self::EmptyQuestion => "Please enter a question.".into(),
            Self::Config(e) => format!("Configuration error: {e}"),
        }
    }

    /// HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
