use crate::handlers::PickRequest;
use crate::humanize::ByteSize;
use mime::Mime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub picker: PickerLimits,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Per-handler sections keyed by handler identity. A `BTreeMap` so
    /// enablement driven from config happens in a stable key order.
    #[serde(default)]
    pub handlers: BTreeMap<String, HandlerConfig>,
}

/// Limits the picker applies to every acquisition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PickerLimits {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: ByteSize,
    #[serde(default)]
    pub allow_offline: bool,
    #[serde(default)]
    pub auto_upload: bool,
}

impl PickerLimits {
    /// Build the request forwarded to a handler's click-action.
    pub fn to_request(&self, mimetypes: Option<Vec<Mime>>) -> PickRequest {
        PickRequest {
            max_size: Some(self.max_file_size),
            auto_upload: self.auto_upload,
            allow_offline: self.allow_offline,
            mimetypes,
        }
    }
}

impl Default for PickerLimits {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allow_offline: false,
            auto_upload: false,
        }
    }
}

fn default_max_file_size() -> ByteSize {
    ByteSize::from_mib(512)
}

/// Session event bus configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_event_buffer() -> usize {
    16
}

/// Settings for the built-in remote URL handler
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Content-type patterns the handler accepts (`image/*` style).
    #[serde(default = "default_accept")]
    pub accept: Vec<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            accept: default_accept(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_accept() -> Vec<String> {
    vec![
        "image/*".to_string(),
        "video/*".to_string(),
        "audio/*".to_string(),
        "application/pdf".to_string(),
    ]
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_user_agent() -> String {
    "PickBox/0.1.0".to_string()
}

/// Per-handler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerConfig {
    /// Whether the handler is enabled when a site session starts.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Display-priority override for built-in handlers.
    pub priority: Option<i32>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            priority: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}
