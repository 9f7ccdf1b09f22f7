use mime::Mime;
use serde_json::Value;
use std::path::PathBuf;

use crate::humanize::ByteSize;

/// Presentation metadata a handler exposes to the picker UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerData {
    pub title: String,
    pub icon: Option<String>,
    pub css_class: Option<String>,
}

impl HandlerData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: None,
            css_class: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = Some(css_class.into());
        self
    }
}

/// One row of a picker query result.
///
/// Built fresh per query and never mutated after return. `mimetypes` is
/// `None` when the query skipped mimetype resolution. `priority` is attached
/// as data for the consumer; the query does not sort by it.
#[derive(Debug, Clone)]
pub struct HandlerEntry {
    pub name: String,
    pub title: String,
    pub icon: Option<String>,
    pub css_class: Option<String>,
    pub priority: Option<i32>,
    pub mimetypes: Option<Vec<Mime>>,
}

impl HandlerEntry {
    pub(crate) fn new(
        name: String,
        data: HandlerData,
        priority: Option<i32>,
        mimetypes: Option<Vec<Mime>>,
    ) -> Self {
        Self {
            name,
            title: data.title,
            icon: data.icon,
            css_class: data.css_class,
            priority,
            mimetypes,
        }
    }
}

/// Arguments the picker UI forwards to a handler's click-action and
/// post-render hook.
#[derive(Debug, Clone, Default)]
pub struct PickRequest {
    /// Upper bound on the acquired file's size, if the caller enforces one.
    pub max_size: Option<ByteSize>,
    /// Hint that the handler may complete the upload itself and answer
    /// [`ActionResult::Handled`].
    pub auto_upload: bool,
    /// The picker is operating without assured connectivity.
    pub allow_offline: bool,
    /// Content types the caller will accept, when it filters at all.
    pub mimetypes: Option<Vec<Mime>>,
}

/// Where an acquired file lives.
#[derive(Debug)]
pub enum FileSource {
    Path(PathBuf),
    Handle(tokio::fs::File),
}

/// Outcome of a handler's click-action.
#[derive(Debug)]
pub enum ActionResult {
    /// The handler fully treated the file itself (e.g. already uploaded).
    Handled {
        /// Opaque upload payload for the caller, when the handler has one.
        upload: Option<Value>,
    },
    /// The caller uploads the produced file.
    File {
        source: FileSource,
        /// The source is temporary and should be removed after use.
        delete_after: bool,
    },
}

impl ActionResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, ActionResult::Handled { .. })
    }
}
