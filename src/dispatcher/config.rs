use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ConfigError;
use crate::normalizer::HandlerError;

/// Status used for successes when none has been configured.
pub const DEFAULT_STATUS: u16 = 200;
/// Status used for failures whose error carries no code.
pub const FALLBACK_ERROR_STATUS: u16 = 500;

/// A user-supplied response writer.
///
/// Called with the response object and the settled outcome. It owns the
/// whole response: the default send/error logic does not run.
pub type CustomStrategy<Res> = Arc<dyn Fn(&Res, Result<Value, HandlerError>) + Send + Sync>;

/// What a handler does with a settled outcome.
pub enum ResponseConfig<Res> {
    /// Default strategy, answering successes with this status.
    Status(u16),
    /// Hand every outcome to a custom strategy.
    Custom(CustomStrategy<Res>),
}

impl<Res> ResponseConfig<Res> {
    pub fn custom<F>(strategy: F) -> Self
    where
        F: Fn(&Res, Result<Value, HandlerError>) + Send + Sync + 'static,
    {
        ResponseConfig::Custom(Arc::new(strategy))
    }
}

impl<Res> fmt::Debug for ResponseConfig<Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseConfig::Status(code) => f.debug_tuple("Status").field(code).finish(),
            ResponseConfig::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub(crate) fn validate_status(code: u16) -> Result<u16, ConfigError> {
    if (200..=599).contains(&code) {
        Ok(code)
    } else {
        Err(ConfigError::InvalidStatusCode(code))
    }
}

/// Per-handler response settings. Installing one strategy does not clear
/// the other; a custom strategy always wins when present.
pub(crate) struct ResponseSettings<Res> {
    pub(crate) status: Option<u16>,
    pub(crate) custom: Option<CustomStrategy<Res>>,
}

impl<Res> ResponseSettings<Res> {
    pub(crate) fn apply(&mut self, config: ResponseConfig<Res>) -> Result<(), ConfigError> {
        match config {
            ResponseConfig::Status(code) => self.status = Some(validate_status(code)?),
            ResponseConfig::Custom(strategy) => self.custom = Some(strategy),
        }
        Ok(())
    }

    pub(crate) fn success_status(&self) -> u16 {
        self.status.unwrap_or(DEFAULT_STATUS)
    }
}

impl<Res> Default for ResponseSettings<Res> {
    fn default() -> Self {
        Self {
            status: None,
            custom: None,
        }
    }
}

impl<Res> Clone for ResponseSettings<Res> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            custom: self.custom.clone(),
        }
    }
}
