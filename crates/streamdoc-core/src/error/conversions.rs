//! From trait implementations for StreamDocError conversions

use super::types::StreamDocError;

impl From<std::io::Error> for StreamDocError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for StreamDocError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for StreamDocError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Invalid TOML: {}", error))
    }
}

impl From<serde_yaml::Error> for StreamDocError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config(format!("Invalid YAML: {}", error))
    }
}

impl From<reqwest::Error> for StreamDocError {
    fn from(error: reqwest::Error) -> Self {
        let url = error.url().map(|u| u.to_string());
        // Body/decode failures happen mid-stream; everything else is request setup.
        if error.is_body() || error.is_decode() {
            return Self::Transport {
                message: error.to_string(),
                context: url,
            };
        }
        Self::Http {
            message: error.to_string(),
            url,
            status_code: error.status().map(|s| s.as_u16()),
            context: None,
        }
    }
}
