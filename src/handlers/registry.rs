use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("handler not found: {0}")]
    NotFound(String),
}

/// Bookkeeping attached to each registration.
pub struct RegistryEntry<H: ?Sized> {
    pub handler: Arc<H>,
    pub registered_at: DateTime<Utc>,
}

impl<H: ?Sized> Clone for RegistryEntry<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            registered_at: self.registered_at,
        }
    }
}

/// Registration and enablement counts for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub registered: usize,
    pub enabled: usize,
}

struct State<H: ?Sized> {
    all: BTreeMap<String, RegistryEntry<H>>,
    /// Site-enabled identities in enablement order. Queries iterate this
    /// order; it is the only ordering the registry guarantees.
    enabled: Vec<String>,
}

/// Generic store of named handler objects.
///
/// Holds non-owning `Arc` handles keyed by a stable identity, with a
/// session-scoped enabled subset on top. Registration uses overwrite
/// semantics: the last handler registered under a name wins, and enabled
/// membership (being name-keyed) survives the overwrite. All operations
/// lock the shared state, so a clear is never interleaved with a query.
pub struct Registry<H: ?Sized> {
    state: RwLock<State<H>>,
}

impl<H: ?Sized> Registry<H> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                all: BTreeMap::new(),
                enabled: Vec::new(),
            }),
        }
    }

    /// Add or overwrite a handler under `name`. Does not change enablement.
    pub fn register(&self, name: impl Into<String>, handler: Arc<H>) {
        let entry = RegistryEntry {
            handler,
            registered_at: Utc::now(),
        };
        self.state.write().all.insert(name.into(), entry);
    }

    /// Mark a registered handler as enabled for the current site.
    ///
    /// Idempotent for an already-enabled handler; enablement order is
    /// first-enable order.
    pub fn enable(&self, name: &str) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        if !state.all.contains_key(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if !state.enabled.iter().any(|n| n == name) {
            state.enabled.push(name.to_string());
        }
        Ok(())
    }

    /// Remove a handler from the enabled subset. The registration stays.
    pub fn disable(&self, name: &str) {
        self.state.write().enabled.retain(|n| n != name);
    }

    pub fn get(&self, name: &str) -> Result<Arc<H>, RegistryError> {
        self.state
            .read()
            .all
            .get(name)
            .map(|entry| Arc::clone(&entry.handler))
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn entry(&self, name: &str) -> Option<RegistryEntry<H>> {
        self.state.read().all.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.read().all.contains_key(name)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.state.read().enabled.iter().any(|n| n == name)
    }

    /// All registered identities, in identity order.
    pub fn names(&self) -> Vec<String> {
        self.state.read().all.keys().cloned().collect()
    }

    /// Enabled handlers in enablement order.
    pub fn enabled_handlers(&self) -> Vec<(String, Arc<H>)> {
        let state = self.state.read();
        state
            .enabled
            .iter()
            .filter_map(|name| {
                state
                    .all
                    .get(name)
                    .map(|entry| (name.clone(), Arc::clone(&entry.handler)))
            })
            .collect()
    }

    /// Empty the enabled subset. Registrations are untouched. Idempotent.
    pub fn clear_enabled(&self) {
        self.state.write().enabled.clear();
    }

    pub fn stats(&self) -> RegistryStats {
        let state = self.state.read();
        RegistryStats {
            registered: state.all.len(),
            enabled: state.enabled.len(),
        }
    }
}

impl<H: ?Sized> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}
