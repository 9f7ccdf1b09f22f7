use async_trait::async_trait;
use mime::Mime;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::traits::{HandlerError, MimetypeSupport, SourceHandler};
use super::types::{ActionResult, FileSource, HandlerData, PickRequest};

/// The UI's file dialog, injected so the handler owns no interaction.
#[async_trait]
pub trait FileChooser: Send + Sync {
    /// Resolve to the chosen path, or `None` when the user cancels.
    async fn choose(&self, request: &PickRequest) -> Option<PathBuf>;
}

/// Built-in handler that picks a file from the local filesystem.
///
/// Browsing can surface any content type, so the handler supports every
/// requested mimetype. The chosen file stays where it is; `delete_after`
/// is never set.
pub struct LocalFileHandler {
    chooser: Arc<dyn FileChooser>,
    priority: Option<i32>,
}

impl LocalFileHandler {
    pub const NAME: &'static str = "local";

    pub fn new(chooser: Arc<dyn FileChooser>) -> Self {
        Self {
            chooser,
            priority: Some(20),
        }
    }

    pub fn with_priority(mut self, priority: Option<i32>) -> Self {
        self.priority = priority;
        self
    }
}

#[async_trait]
impl SourceHandler for LocalFileHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn data(&self) -> HandlerData {
        HandlerData::new("Browse files")
            .icon("folder")
            .css_class("pickbox-local")
    }

    fn priority(&self) -> Option<i32> {
        self.priority
    }

    fn supported_mimetypes(&self, requested: &[Mime]) -> MimetypeSupport {
        MimetypeSupport::Matched(requested.to_vec())
    }

    async fn pick(&self, request: PickRequest) -> Result<ActionResult, HandlerError> {
        let path = self
            .chooser
            .choose(&request)
            .await
            .ok_or(HandlerError::Cancelled)?;

        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            HandlerError::Acquisition(format!("cannot stat {}: {}", path.display(), e))
        })?;

        if let Some(limit) = request.max_size {
            if metadata.len() > limit.as_u64() {
                return Err(HandlerError::TooLarge {
                    size: metadata.len(),
                    limit: limit.as_u64(),
                });
            }
        }

        debug!(path = %path.display(), size = metadata.len(), "Local file selected");

        Ok(ActionResult::File {
            source: FileSource::Path(path),
            delete_after: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::ByteSize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct FixedChooser(Option<PathBuf>);

    #[async_trait]
    impl FileChooser for FixedChooser {
        async fn choose(&self, _request: &PickRequest) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    fn sample_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_metadata() {
        let handler = LocalFileHandler::new(Arc::new(FixedChooser(None)));
        assert_eq!(handler.name(), "local");
        assert_eq!(handler.priority(), Some(20));

        let data = handler.data();
        assert_eq!(data.title, "Browse files");
        assert_eq!(data.icon.as_deref(), Some("folder"));
    }

    #[test]
    fn test_supports_all_requested() {
        let handler = LocalFileHandler::new(Arc::new(FixedChooser(None)));
        let requested: Vec<Mime> =
            vec!["image/png".parse().unwrap(), "application/zip".parse().unwrap()];

        match handler.supported_mimetypes(&requested) {
            MimetypeSupport::Matched(subset) => assert_eq!(subset, requested),
            other => panic!("unexpected support: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pick_returns_chosen_path() {
        let file = sample_file(b"hello");
        let path = file.path().to_path_buf();
        let handler = LocalFileHandler::new(Arc::new(FixedChooser(Some(path.clone()))));

        let result = handler.pick(PickRequest::default()).await.unwrap();
        match result {
            ActionResult::File { source: FileSource::Path(p), delete_after } => {
                assert_eq!(p, path);
                assert!(!delete_after);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pick_enforces_max_size() {
        let file = sample_file(&[0u8; 64]);
        let handler =
            LocalFileHandler::new(Arc::new(FixedChooser(Some(file.path().to_path_buf()))));

        let request = PickRequest {
            max_size: Some(ByteSize(16)),
            ..Default::default()
        };

        let err = handler.pick(request).await.unwrap_err();
        assert!(matches!(err, HandlerError::TooLarge { size: 64, limit: 16 }));
    }

    #[tokio::test]
    async fn test_pick_cancelled() {
        let handler = LocalFileHandler::new(Arc::new(FixedChooser(None)));
        let err = handler.pick(PickRequest::default()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Cancelled));
    }

    #[tokio::test]
    async fn test_pick_missing_file() {
        let handler = LocalFileHandler::new(Arc::new(FixedChooser(Some(PathBuf::from(
            "/nonexistent/pickbox-test",
        )))));
        let err = handler.pick(PickRequest::default()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Acquisition(_)));
    }
}
