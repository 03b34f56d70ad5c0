//! Accessor specifications (`"req.<path>"` / `"res.<path>"`).

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::resolve::Resolve;
use crate::error::ConfigError;

/// Which side of the `(req, res)` pair an accessor reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Req,
    Res,
}

impl Side {
    fn prefix(self) -> &'static str {
        match self {
            Side::Req => "req.",
            Side::Res => "res.",
        }
    }
}

/// A validated, pre-split accessor path.
///
/// Parsing happens once at handler creation; every invocation reuses the
/// split segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    side: Side,
    segments: Vec<String>,
}

impl Accessor {
    /// Parse an accessor spec. Anything not starting with `req.` or `res.` is rejected.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let (side, rest) = if let Some(rest) = spec.strip_prefix(Side::Req.prefix()) {
            (Side::Req, rest)
        } else if let Some(rest) = spec.strip_prefix(Side::Res.prefix()) {
            (Side::Res, rest)
        } else {
            return Err(ConfigError::InvalidAccessor(spec.to_string()));
        };

        let segments = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('.').map(str::to_string).collect()
        };

        Ok(Self { side, segments })
    }

    /// Accessor for the whole request or response object.
    pub fn root(side: Side) -> Self {
        Self {
            side,
            segments: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Read this accessor's value out of the binding context.
    pub fn extract(&self, req: &dyn Resolve, res: &dyn Resolve) -> Option<Value> {
        match self.side {
            Side::Req => req.resolve(&self.segments),
            Side::Res => res.resolve(&self.segments),
        }
    }
}

impl FromStr for Accessor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Accessor::parse(s)
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.prefix(), self.segments.join("."))
    }
}
