//! Client configuration

use super::logging_config::LoggingConfig;
use crate::error::{StreamDocError, StreamDocResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/chat";

/// Default connection timeout (30 seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default terminal width for rendering
pub const DEFAULT_WIDTH: usize = 80;

/// Rendering options for presenters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Wrap width in columns
    pub width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
        }
    }
}

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// URL the chat request is POSTed to
    pub endpoint: String,
    /// TCP connect timeout in seconds. The stream itself has no read timeout.
    pub connect_timeout_secs: u64,
    /// Optional User-Agent header
    pub user_agent: Option<String>,
    pub logging: LoggingConfig,
    pub render: RenderConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: None,
            logging: LoggingConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Values explicitly set by one configuration layer (environment, flags)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverlay {
    pub endpoint: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub width: Option<usize>,
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Overlay values from a higher-priority source.
    ///
    /// Every field set in `overlay` wins, even when it equals the default.
    pub fn merge(&mut self, overlay: ConfigOverlay) {
        if let Some(endpoint) = overlay.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = overlay.connect_timeout_secs {
            self.connect_timeout_secs = timeout;
        }
        if overlay.user_agent.is_some() {
            self.user_agent = overlay.user_agent;
        }
        if let Some(level) = overlay.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overlay.log_format {
            self.logging.format = format;
        }
        if let Some(width) = overlay.width {
            self.render.width = width;
        }
    }

    pub fn validate(&self) -> StreamDocResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(StreamDocError::invalid_input_field(
                "Endpoint must not be empty",
                "endpoint",
            ));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(StreamDocError::invalid_input_field(
                format!("Endpoint must be an http(s) URL, got '{}'", self.endpoint),
                "endpoint",
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(StreamDocError::invalid_input_field(
                "Connect timeout must be greater than zero",
                "connect_timeout_secs",
            ));
        }
        if self.render.width == 0 {
            return Err(StreamDocError::invalid_input_field(
                "Render width must be greater than zero",
                "render.width",
            ));
        }
        Ok(())
    }
}
