use std::fmt;

/// Raised synchronously while creating or configuring a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Accessor spec that does not start with `req.` or `res.`.
    InvalidAccessor(String),
    /// Status code outside `200..=599`.
    InvalidStatusCode(u16),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAccessor(spec) => write!(
                f,
                "accessor strings must start with `req.` or `res.` (got `{}`)",
                spec
            ),
            ConfigError::InvalidStatusCode(code) => write!(
                f,
                "responseCode must be an HTTP response code (got {})",
                code
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Raised synchronously by [`Handler::call`](crate::Handler::call) before any binding happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    MissingRequestOrResponse,
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationError::MissingRequestOrResponse => {
                write!(f, "Handler must be invoked with req and res objects")
            }
        }
    }
}

impl std::error::Error for InvocationError {}
