use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::traits::{match_supported, HandlerError, MimetypeSupport, SourceHandler};
use super::types::{ActionResult, FileSource, HandlerData, PickRequest};
use crate::config::Config;

/// The UI's URL input dialog, injected like the local handler's chooser.
#[async_trait]
pub trait UrlPrompt: Send + Sync {
    /// Resolve to the entered URL, or `None` when the user cancels.
    async fn request_url(&self) -> Option<String>;
}

/// Settings for the remote URL handler's HTTP client
#[derive(Debug, Clone)]
pub struct RemoteUrlConfig {
    pub accept: Vec<Mime>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub user_agent: String,
    pub priority: Option<i32>,
}

impl RemoteUrlConfig {
    /// Derive handler settings from the crate configuration. Unparsable
    /// accept patterns are skipped with a warning rather than failing the
    /// handler (config validation reports them properly at load time).
    pub fn from_config(config: &Config) -> Self {
        let accept = config
            .remote
            .accept
            .iter()
            .filter_map(|pattern| match pattern.parse::<Mime>() {
                Ok(mime) => Some(mime),
                Err(_) => {
                    warn!(pattern = %pattern, "Skipping invalid accept pattern");
                    None
                }
            })
            .collect();

        let priority = config
            .handlers
            .get(RemoteUrlHandler::NAME)
            .and_then(|handler| handler.priority)
            .or(Some(30));

        Self {
            accept,
            connect_timeout: Duration::from_secs(config.remote.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.remote.request_timeout_secs),
            max_retries: config.remote.max_retries,
            user_agent: config.remote.user_agent.clone(),
            priority,
        }
    }
}

impl Default for RemoteUrlConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Built-in handler that downloads a user-entered URL into a temp file.
///
/// The downloaded copy is temporary, so results carry `delete_after`.
pub struct RemoteUrlHandler {
    client: Client,
    prompt: Arc<dyn UrlPrompt>,
    config: RemoteUrlConfig,
    download_dir: PathBuf,
}

impl RemoteUrlHandler {
    pub const NAME: &'static str = "remote_url";

    pub fn new(config: RemoteUrlConfig, prompt: Arc<dyn UrlPrompt>) -> Result<Self, HandlerError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HandlerError::Acquisition(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            prompt,
            config,
            download_dir: std::env::temp_dir(),
        })
    }

    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    /// Download with retry, matching the crate-wide backoff convention
    /// (1s, 2s, 4s, ...).
    async fn fetch(&self, url: &str, max_size: Option<u64>) -> Result<Bytes, HandlerError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.fetch_once(url, max_size).await {
                Ok(bytes) => {
                    if attempts > 1 {
                        debug!(url, attempts, "Download succeeded after retry");
                    }
                    return Ok(bytes);
                }
                // Size violations are final; retrying cannot shrink the file.
                Err(err @ HandlerError::TooLarge { .. }) => return Err(err),
                Err(err) => {
                    if attempts >= self.config.max_retries {
                        warn!(url, attempts, error = %err, "Download failed after retries");
                        return Err(err);
                    }

                    warn!(url, attempts, error = %err, "Download failed, retrying");
                    let backoff = Duration::from_secs(2u64.pow(attempts - 1));
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str, max_size: Option<u64>) -> Result<Bytes, HandlerError> {
        debug!(url, "Starting download");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                HandlerError::Timeout
            } else {
                HandlerError::Acquisition(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HandlerError::Acquisition(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if let (Some(limit), Some(length)) = (max_size, response.content_length()) {
            if length > limit {
                return Err(HandlerError::TooLarge {
                    size: length,
                    limit,
                });
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HandlerError::Acquisition(format!("Failed to read body: {}", e)))?;

        // Servers may omit or understate Content-Length.
        if let Some(limit) = max_size {
            if bytes.len() as u64 > limit {
                return Err(HandlerError::TooLarge {
                    size: bytes.len() as u64,
                    limit,
                });
            }
        }

        debug!(url, size = bytes.len(), "Download completed");

        Ok(bytes)
    }
}

#[async_trait]
impl SourceHandler for RemoteUrlHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn data(&self) -> HandlerData {
        HandlerData::new("From URL")
            .icon("link")
            .css_class("pickbox-remote")
    }

    fn priority(&self) -> Option<i32> {
        self.config.priority
    }

    fn supported_mimetypes(&self, requested: &[Mime]) -> MimetypeSupport {
        MimetypeSupport::Matched(match_supported(&self.config.accept, requested))
    }

    async fn pick(&self, request: PickRequest) -> Result<ActionResult, HandlerError> {
        if request.allow_offline {
            return Err(HandlerError::Offline);
        }

        let url = self
            .prompt
            .request_url()
            .await
            .ok_or(HandlerError::Cancelled)?;

        let bytes = self
            .fetch(&url, request.max_size.map(|size| size.as_u64()))
            .await?;

        let path = self.download_dir.join(format!("pickbox-{}", Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            HandlerError::Acquisition(format!("cannot write {}: {}", path.display(), e))
        })?;

        info!(url = %url, path = %path.display(), size = bytes.len(), "Remote file downloaded");

        Ok(ActionResult::File {
            source: FileSource::Path(path),
            delete_after: true,
        })
    }
}
