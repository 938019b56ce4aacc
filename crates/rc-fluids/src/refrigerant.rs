//! Refrigerant identities and the backend registry that issues them.

use std::fmt;
use std::sync::Arc;

use crate::backend::PropertyBackend;
use crate::error::{PropertyError, PropertyResult};
use crate::reference::ReferenceBackend;

/// Opaque token for a refrigerant resolved by a [`BackendRegistry`].
///
/// Carries the canonical name and the slot of the backend that claimed it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RefrigerantId {
    name: Arc<str>,
    backend: usize,
}

impl RefrigerantId {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for RefrigerantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefrigerantId({}@{})", self.name, self.backend)
    }
}

impl fmt::Display for RefrigerantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Normalized key for alias matching: upper case, alphanumerics only, with
/// `R`/`HFC`/`HCFC`/`HFO` prefixes removed (`"HFC-134a"` and `"r134a"` both
/// become `"134A"`).
pub fn refrigerant_key(name: &str) -> String {
    let compact: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    for prefix in ["HCFC", "HFC", "HFO", "R"] {
        if let Some(rest) = compact.strip_prefix(prefix)
            && rest.starts_with(|c: char| c.is_ascii_digit())
        {
            return rest.to_owned();
        }
    }
    compact
}

/// Ordered set of property backends. The first backend that claims a name
/// wins, so registration order expresses preference.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn PropertyBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the analytic [`ReferenceBackend`].
    pub fn with_reference() -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(ReferenceBackend::new()));
        reg
    }

    pub fn register(&mut self, backend: Arc<dyn PropertyBackend>) {
        self.backends.push(backend);
    }

    pub fn backends(&self) -> impl Iterator<Item = &Arc<dyn PropertyBackend>> {
        self.backends.iter()
    }

    pub fn resolve(&self, name: &str) -> PropertyResult<RefrigerantId> {
        self.backends
            .iter()
            .enumerate()
            .find_map(|(slot, b)| {
                b.canonical_name(name).map(|canonical| RefrigerantId {
                    name: Arc::from(canonical),
                    backend: slot,
                })
            })
            .ok_or_else(|| PropertyError::UnsupportedRefrigerant {
                name: name.to_owned(),
            })
    }

    /// Backend bound to `id`.
    pub fn backend(&self, id: &RefrigerantId) -> PropertyResult<Arc<dyn PropertyBackend>> {
        self.backends
            .get(id.backend)
            .filter(|b| b.supports(id))
            .cloned()
            .ok_or_else(|| PropertyError::UnsupportedRefrigerant {
                name: id.name().to_owned(),
            })
    }

    /// Every `(backend, refrigerant)` pair known to the registry.
    pub fn catalog(&self) -> Vec<(String, String)> {
        self.backends
            .iter()
            .flat_map(|b| {
                b.refrigerants()
                    .into_iter()
                    .map(|r| (b.name().to_owned(), r))
            })
            .collect()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.backends.iter().map(|b| b.name().to_owned()))
            .finish()
    }
}
