use mime::Mime;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::local::{FileChooser, LocalFileHandler};
use super::registry::{Registry, RegistryError, RegistryStats};
use super::remote::{RemoteUrlConfig, RemoteUrlHandler, UrlPrompt};
use super::traits::{HandlerError, MimetypeSupport, SourceHandler};
use super::types::HandlerEntry;
use crate::config::Config;
use crate::observability::Metrics;
use crate::session::SessionEvent;

/// File-acquisition delegate: the picker-facing view of the handler
/// registry.
///
/// Handlers register under their identity for the lifetime of the process;
/// a site session enables a subset of them. The picker UI queries
/// [`handlers`](PickerRegistry::handlers) for the presentation records of
/// the enabled handlers that apply to its requested content types, and
/// invokes a chosen handler's click-action through
/// [`get`](PickerRegistry::get). Logout discards the enabled subset only.
pub struct PickerRegistry {
    handlers: Registry<dyn SourceHandler>,
    metrics: Arc<Metrics>,
}

impl PickerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Registry::new(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Create a registry with the built-in handlers registered. The file
    /// dialog and URL prompt stay with the caller; nothing is enabled yet
    /// (see [`apply_config`](PickerRegistry::apply_config)).
    pub fn with_defaults(
        config: &Config,
        chooser: Arc<dyn FileChooser>,
        prompt: Arc<dyn UrlPrompt>,
    ) -> Result<Self, HandlerError> {
        let registry = Self::new();

        let local_priority = config
            .handlers
            .get(LocalFileHandler::NAME)
            .and_then(|handler| handler.priority)
            .or(Some(20));
        registry.register(Arc::new(
            LocalFileHandler::new(chooser).with_priority(local_priority),
        ));

        let remote = RemoteUrlHandler::new(RemoteUrlConfig::from_config(config), prompt)?;
        registry.register(Arc::new(remote));

        Ok(registry)
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Add or overwrite a handler under its own identity.
    pub fn register(&self, handler: Arc<dyn SourceHandler>) {
        let name = handler.name().to_string();
        self.handlers.register(name.clone(), handler);
        self.metrics.handler_registered();
        info!(name = %name, "Handler registered");
    }

    /// Enable a registered handler for the current site.
    pub fn enable(&self, name: &str) -> Result<(), RegistryError> {
        self.handlers.enable(name)?;
        self.metrics.handler_enabled();
        debug!(name = %name, "Handler enabled for site");
        Ok(())
    }

    /// Remove a handler from the current site without unregistering it.
    pub fn disable(&self, name: &str) {
        self.handlers.disable(name);
        debug!(name = %name, "Handler disabled for site");
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn SourceHandler>, RegistryError> {
        self.handlers.get(name)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.handlers.is_enabled(name)
    }

    pub fn stats(&self) -> RegistryStats {
        self.handlers.stats()
    }

    /// Enable every registered handler whose config section asks for it,
    /// in the config's key order. Sections for unregistered handlers are
    /// skipped with a warning.
    pub fn apply_config(&self, config: &Config) {
        for (name, handler_config) in &config.handlers {
            if !handler_config.enabled {
                continue;
            }
            match self.enable(name) {
                Ok(()) => {}
                Err(RegistryError::NotFound(_)) => {
                    warn!(name = %name, "Config enables unknown handler, skipping");
                }
            }
        }
    }

    /// Discard the site-scoped enabled subset. Registrations are kept.
    /// Idempotent; runs on every logout.
    pub fn clear_site_handlers(&self) {
        self.handlers.clear_enabled();
        self.metrics.site_cleared();
        debug!("Site handlers cleared");
    }

    /// Presentation records for the enabled handlers that apply to
    /// `mimetypes`.
    ///
    /// With a filter, a handler that declares no mimetype support or
    /// matches none of the requested types is silently excluded; survivors
    /// carry their resolved subset. Without a filter every enabled handler
    /// is included and no resolution happens. Output keeps the registry's
    /// enablement order; `priority` is attached for the caller to sort by.
    pub fn handlers(&self, mimetypes: Option<&[Mime]>) -> Vec<HandlerEntry> {
        self.metrics.query_served();

        let enabled = self.handlers.enabled_handlers();
        let mut entries = Vec::with_capacity(enabled.len());

        for (name, handler) in enabled {
            let resolved = match mimetypes {
                Some(requested) => match handler.supported_mimetypes(requested) {
                    support if support.excludes() => {
                        debug!(name = %name, "Handler excluded from filtered query");
                        continue;
                    }
                    MimetypeSupport::Matched(subset) => Some(subset),
                    MimetypeSupport::Undeclared => continue,
                },
                None => None,
            };

            entries.push(HandlerEntry::new(
                name,
                handler.data(),
                handler.priority(),
                resolved,
            ));
        }

        entries
    }

    /// Subscribe to session events: every logout clears the site-enabled
    /// handlers. A lagged receiver clears once conservatively, since
    /// missing a logout is worse than an extra idempotent clear.
    pub fn spawn_logout_listener(
        self: Arc<Self>,
        mut events: broadcast::Receiver<SessionEvent>,
    ) -> JoinHandle<()> {
        let registry = self;
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::LoggedOut) => registry.clear_site_handlers(),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Session events lagged, clearing site handlers");
                        registry.clear_site_handlers();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for PickerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
