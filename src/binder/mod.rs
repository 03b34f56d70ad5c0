//! Parameter binding: turns a `(req, res)` pair into promiser arguments.
//!
//! The binding is fixed when a handler is created. Accessor specs are
//! validated and split once; each invocation only walks the pre-split paths.

mod accessor;
mod args;
mod resolve;

pub use accessor::{Accessor, Side};
pub use args::Args;
pub use resolve::{lookup, Resolve};

use crate::error::ConfigError;

/// How a handler builds its promiser's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// One argument per accessor, in order. An empty list means no arguments.
    Paths(Vec<Accessor>),
    /// Two arguments: the whole request, then the whole response.
    Whole,
}

impl Binding {
    /// Validate a list of accessor specs.
    pub fn paths<I, S>(specs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        specs
            .into_iter()
            .map(|spec| Accessor::parse(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Binding::Paths)
    }

    pub fn none() -> Self {
        Binding::Paths(Vec::new())
    }
}

/// Resolves a fixed [`Binding`] against each incoming pair.
#[derive(Debug, Clone)]
pub(crate) struct Binder {
    accessors: Vec<Accessor>,
}

impl Binder {
    pub(crate) fn new(binding: Binding) -> Self {
        let accessors = match binding {
            Binding::Paths(accessors) => accessors,
            Binding::Whole => vec![Accessor::root(Side::Req), Accessor::root(Side::Res)],
        };
        Self { accessors }
    }

    pub(crate) fn bind(&self, req: &dyn Resolve, res: &dyn Resolve) -> Args {
        Args::new(
            self.accessors
                .iter()
                .map(|accessor| accessor.extract(req, res))
                .collect(),
        )
    }

    pub(crate) fn arity(&self) -> usize {
        self.accessors.len()
    }
}
