//! Dotted-path reads over request and response objects.

use serde_json::Value;

/// A structure that accessor paths can be resolved against.
///
/// Request and response types implement this so the binder can pull
/// arguments out of them without knowing their concrete shape. Resolution
/// is total: a missing key anywhere along the path yields `None`.
pub trait Resolve {
    /// Resolve a path of segments. An empty path addresses the whole object.
    fn resolve(&self, path: &[String]) -> Option<Value>;

    /// Whether the object is structurally absent (e.g. a JSON `null`).
    fn is_absent(&self) -> bool {
        false
    }
}

impl Resolve for Value {
    fn resolve(&self, path: &[String]) -> Option<Value> {
        lookup(self, path).cloned()
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

impl<T: Resolve + ?Sized> Resolve for &T {
    fn resolve(&self, path: &[String]) -> Option<Value> {
        (**self).resolve(path)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

/// Walk `path` from `root`, borrowing the value found at the end.
///
/// Object segments are looked up by key; array segments must parse as an index.
pub fn lookup<'v>(root: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter().try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
