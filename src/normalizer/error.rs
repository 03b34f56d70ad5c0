//! Promiser failure type.

use std::error::Error;
use std::fmt;

/// Why a promiser invocation failed.
///
/// Every failure is reported on the error channel and, unless a custom
/// response strategy is installed, answered with [`code`](Self::code) (or 500)
/// and [`message`](Self::message).
#[derive(Debug)]
pub enum HandlerError {
    /// Explicit status and message chosen by the promiser.
    Status { code: u16, message: String },
    /// A bound argument was absent.
    Missing(usize),
    /// A bound argument did not deserialize into the requested type.
    DecodeFailed(String),
    /// The success value could not be serialized into a response body.
    EncodeFailed(String),
    /// Business logic rejected the input.
    Rejected(String),
    /// Resource not found.
    NotFound(String),
    /// Missing or invalid credentials.
    Unauthorized(String),
    /// The promiser panicked.
    Panicked(String),
    /// Any other error. Carries no status code of its own.
    Other(Box<dyn Error + Send + Sync>),
}

impl HandlerError {
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        HandlerError::Status {
            code,
            message: message.into(),
        }
    }

    pub fn other<E: Error + Send + Sync + 'static>(err: E) -> Self {
        HandlerError::Other(Box::new(err))
    }

    /// The status code this error carries, if any.
    ///
    /// Codes outside `100..=599` count as no code.
    pub fn code(&self) -> Option<u16> {
        let code = match self {
            HandlerError::Status { code, .. } => Some(*code),
            HandlerError::Missing(_) => Some(400),
            HandlerError::DecodeFailed(_) => Some(400),
            HandlerError::Rejected(_) => Some(422),
            HandlerError::NotFound(_) => Some(404),
            HandlerError::Unauthorized(_) => Some(401),
            HandlerError::EncodeFailed(_) | HandlerError::Panicked(_) | HandlerError::Other(_) => {
                None
            }
        };
        code.filter(|code| (100..=599).contains(code))
    }

    /// The human-readable message sent as a failure body.
    pub fn message(&self) -> String {
        match self {
            HandlerError::Status { message, .. } => message.clone(),
            HandlerError::Other(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Status { code, message } => write!(f, "{} ({})", message, code),
            HandlerError::Missing(index) => write!(f, "missing argument {}", index),
            HandlerError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
            HandlerError::EncodeFailed(msg) => write!(f, "encode failed: {}", msg),
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::NotFound(id) => write!(f, "not found: {}", id),
            HandlerError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            HandlerError::Panicked(msg) => write!(f, "promiser panicked: {}", msg),
            HandlerError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        HandlerError::Other(Box::new(err))
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        HandlerError::Other(message.into())
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        HandlerError::Other(message.into())
    }
}

impl From<std::convert::Infallible> for HandlerError {
    fn from(err: std::convert::Infallible) -> Self {
        match err {}
    }
}
