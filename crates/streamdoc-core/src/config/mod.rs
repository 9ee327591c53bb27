//! Configuration management for streamdoc
//!
//! Sources are layered: defaults < config file < environment < CLI overrides.

mod client_config;
mod env_loader;
mod file_loader;
mod logging_config;

pub use client_config::{
    ClientConfig, ConfigOverlay, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENDPOINT, DEFAULT_WIDTH,
    RenderConfig,
};
pub use env_loader::load_from_env;
pub use file_loader::load_from_file;
pub use logging_config::LoggingConfig;

use crate::error::StreamDocResult;
use std::path::Path;

/// Load configuration from `path` (if it exists), then apply the environment
/// and finally `overrides`, and validate the result
pub fn load_config(
    path: impl AsRef<Path>,
    overrides: ConfigOverlay,
) -> StreamDocResult<ClientConfig> {
    let mut config = load_from_file(path.as_ref())?;
    config.merge(load_from_env()?);
    config.merge(overrides);
    config.validate()?;
    Ok(config)
}
