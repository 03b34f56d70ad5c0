//! The argument list handed to a promiser.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::normalizer::HandlerError;

/// Arguments bound for one invocation, in accessor order.
///
/// A slot is `None` when its path did not resolve.
///
/// ```ignore
/// let handler = qed.create(
///     |args: Args| async move {
///         let id: u64 = args.get(0)?;
///         let verbose = args.get_opt::<bool>(1)?.unwrap_or(false);
///         lookup(id, verbose).await
///     },
///     ["req.params.id", "req.query.verbose"],
/// )?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<Option<Value>>,
}

impl Args {
    pub fn new(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    /// Deserialize the argument at `index`. Fails with `Missing` if the slot is empty.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, HandlerError> {
        let value = self.value(index).ok_or(HandlerError::Missing(index))?;
        serde_json::from_value(value.clone())
            .map_err(|e| HandlerError::DecodeFailed(format!("argument {}: {}", index, e)))
    }

    /// Like [`get`](Self::get), but an empty slot is `Ok(None)`.
    pub fn get_opt<T: DeserializeOwned>(&self, index: usize) -> Result<Option<T>, HandlerError> {
        match self.value(index) {
            None => Ok(None),
            Some(_) => self.get(index).map(Some),
        }
    }

    /// The raw value at `index`.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Option<Value>> {
        self.values
    }
}
