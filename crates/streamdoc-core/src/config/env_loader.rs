//! Environment variable-based configuration loading

use super::client_config::ConfigOverlay;
use crate::error::{StreamDocError, StreamDocResult};
use std::env;

pub const ENV_ENDPOINT: &str = "STREAMDOC_ENDPOINT";
pub const ENV_CONNECT_TIMEOUT: &str = "STREAMDOC_CONNECT_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "STREAMDOC_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "STREAMDOC_LOG_FORMAT";
pub const ENV_WIDTH: &str = "STREAMDOC_WIDTH";

/// Read the `STREAMDOC_*` environment variables that are set
pub fn load_from_env() -> StreamDocResult<ConfigOverlay> {
    load_with(|key| env::var(key).ok())
}

fn load_with(lookup: impl Fn(&str) -> Option<String>) -> StreamDocResult<ConfigOverlay> {
    Ok(ConfigOverlay {
        endpoint: lookup(ENV_ENDPOINT),
        connect_timeout_secs: parse_number(&lookup, ENV_CONNECT_TIMEOUT)?,
        user_agent: None,
        log_level: lookup(ENV_LOG_LEVEL),
        log_format: lookup(ENV_LOG_FORMAT),
        width: parse_number(&lookup, ENV_WIDTH)?,
    })
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> StreamDocResult<Option<T>> {
    lookup(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| {
                StreamDocError::config(format!("Invalid {} value: '{}'", key, raw))
            })
        })
        .transpose()
}
