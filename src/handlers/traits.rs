use async_trait::async_trait;
use mime::Mime;
use thiserror::Error;

use super::types::{ActionResult, HandlerData, PickRequest};

/// Errors surfaced through a handler's own click-action
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler '{0}' has no click action")]
    NoAction(String),

    #[error("selection cancelled")]
    Cancelled,

    #[error("handler requires network access")]
    Offline,

    #[error("request timed out")]
    Timeout,

    #[error("file too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("acquisition failed: {0}")]
    Acquisition(String),
}

/// A handler's declared mimetype support for one query.
///
/// `Undeclared` is the handler-does-not-filter case: such handlers are
/// excluded from filtered queries and included in unfiltered ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimetypeSupport {
    Undeclared,
    Matched(Vec<Mime>),
}

impl MimetypeSupport {
    /// True when this declaration excludes the handler from a filtered query.
    pub fn excludes(&self) -> bool {
        match self {
            MimetypeSupport::Undeclared => true,
            MimetypeSupport::Matched(subset) => subset.is_empty(),
        }
    }
}

/// Capability contract for a file-acquisition handler.
///
/// Implementations are registered with [`super::PickerRegistry`] under the
/// identity returned by [`name`](SourceHandler::name) and held behind
/// `Arc<dyn SourceHandler>`. The registry never performs acquisition itself;
/// the picker UI awaits [`pick`](SourceHandler::pick) directly.
#[async_trait]
pub trait SourceHandler: Send + Sync {
    /// Stable identity; last registration under a name wins.
    fn name(&self) -> &str;

    /// Presentation metadata for the picker UI.
    fn data(&self) -> HandlerData;

    /// Display ranking hint. `None` is ordering-neutral.
    fn priority(&self) -> Option<i32> {
        None
    }

    /// Subset of `requested` this handler can act on.
    fn supported_mimetypes(&self, _requested: &[Mime]) -> MimetypeSupport {
        MimetypeSupport::Undeclared
    }

    /// The click-action. Optional: the default rejects with
    /// [`HandlerError::NoAction`].
    async fn pick(&self, _request: PickRequest) -> Result<ActionResult, HandlerError> {
        Err(HandlerError::NoAction(self.name().to_string()))
    }

    /// Hook invoked after the picker UI has rendered this handler's entry.
    fn after_render(&self, _request: &PickRequest) {}
}

/// True when `candidate` falls under `pattern` (`image/*` covers
/// `image/png`; `*/*` covers everything).
pub fn mimetype_matches(pattern: &Mime, candidate: &Mime) -> bool {
    if pattern.type_() == mime::STAR {
        return true;
    }
    if pattern.type_() != candidate.type_() {
        return false;
    }
    pattern.subtype() == mime::STAR || pattern.subtype() == candidate.subtype()
}

/// Subset of `requested` covered by at least one pattern in `accepts`.
pub fn match_supported(accepts: &[Mime], requested: &[Mime]) -> Vec<Mime> {
    requested
        .iter()
        .filter(|candidate| accepts.iter().any(|pattern| mimetype_matches(pattern, candidate)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mime(s: &str) -> Mime {
        s.parse().unwrap()
    }

    #[test]
    fn test_exact_match() {
        assert!(mimetype_matches(&mime("image/png"), &mime("image/png")));
        assert!(!mimetype_matches(&mime("image/png"), &mime("image/jpeg")));
        assert!(!mimetype_matches(&mime("image/png"), &mime("video/png")));
    }

    #[test]
    fn test_wildcard_subtype() {
        assert!(mimetype_matches(&mime("image/*"), &mime("image/png")));
        assert!(mimetype_matches(&mime("image/*"), &mime("image/jpeg")));
        assert!(!mimetype_matches(&mime("image/*"), &mime("video/mp4")));
    }

    #[test]
    fn test_wildcard_type() {
        assert!(mimetype_matches(&mime("*/*"), &mime("application/pdf")));
        assert!(mimetype_matches(&mime("*/*"), &mime("text/plain")));
    }

    #[test]
    fn test_match_supported_subset() {
        let accepts = vec![mime("image/*"), mime("application/pdf")];
        let requested = vec![mime("image/png"), mime("video/mp4"), mime("application/pdf")];

        let matched = match_supported(&accepts, &requested);
        assert_eq!(matched, vec![mime("image/png"), mime("application/pdf")]);
    }

    #[test]
    fn test_match_supported_empty() {
        let accepts = vec![mime("audio/*")];
        let requested = vec![mime("image/png")];
        assert!(match_supported(&accepts, &requested).is_empty());
    }

    #[test]
    fn test_support_exclusion() {
        assert!(MimetypeSupport::Undeclared.excludes());
        assert!(MimetypeSupport::Matched(vec![]).excludes());
        assert!(!MimetypeSupport::Matched(vec![mime("image/png")]).excludes());
    }
}
