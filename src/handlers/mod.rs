//! Handler system for PickBox
//!
//! This module provides the handler trait, registry, and built-in handlers
//! behind the file picker: each handler offers one way to acquire a file
//! (local browse, remote URL, camera, gallery, ...), and the picker UI asks
//! the registry which enabled handlers apply to its requested content types.
//!
//! ## Key Components
//!
//! - [`SourceHandler`] - Main trait for implementing acquisition handlers
//! - [`PickerRegistry`] - The picker-facing delegate over the generic registry
//! - [`Registry`] - Reusable named-handler store with site enablement
//! - [`HandlerEntry`] - Presentation record returned to the picker UI
//! - [`LocalFileHandler`] / [`RemoteUrlHandler`] - Built-in handlers
//!
//! ## Example
//!
//! ```rust,ignore
//! use pickbox::handlers::PickerRegistry;
//!
//! let registry = PickerRegistry::with_defaults(&config, chooser, prompt)?;
//! registry.apply_config(&config);
//!
//! let jpeg = "image/jpeg".parse()?;
//! for entry in registry.handlers(Some(&[jpeg])) {
//!     println!("{} (priority {:?})", entry.title, entry.priority);
//! }
//! ```

mod local;
mod picker;
mod registry;
mod remote;
mod traits;
pub(crate) mod types;

pub use local::{FileChooser, LocalFileHandler};
pub use picker::PickerRegistry;
pub use registry::{Registry, RegistryEntry, RegistryError, RegistryStats};
pub use remote::{RemoteUrlConfig, RemoteUrlHandler, UrlPrompt};
pub use traits::{
    match_supported, mimetype_matches, HandlerError, MimetypeSupport, SourceHandler,
};
pub use types::{ActionResult, FileSource, HandlerData, HandlerEntry, PickRequest};
