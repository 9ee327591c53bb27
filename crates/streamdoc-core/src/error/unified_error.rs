//! UnifiedError trait implementation for StreamDocError

use super::types::{StreamDocError, UnifiedError};

impl UnifiedError for StreamDocError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "STREAMDOC_CONFIG",
            Self::Transport { .. } => "STREAMDOC_TRANSPORT",
            Self::Http { .. } => "STREAMDOC_HTTP",
            Self::Protocol { .. } => "STREAMDOC_PROTOCOL",
            Self::Json { .. } => "STREAMDOC_JSON",
            Self::Io { .. } => "STREAMDOC_IO",
            Self::Render { .. } => "STREAMDOC_RENDER",
            Self::InvalidInput { .. } => "STREAMDOC_INVALID_INPUT",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } => message,
            Self::Transport { message, .. } => message,
            Self::Http { message, .. } => message,
            Self::Protocol { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::Io { message, .. } => message,
            Self::Render { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::Transport { context, .. } => context.as_deref(),
            Self::Http { context, .. } => context.as_deref(),
            Self::Protocol { context, .. } => context.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::Io { context, .. } => context.as_deref(),
            Self::Render { context, .. } => context.as_deref(),
            Self::InvalidInput { context, .. } => context.as_deref(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Http { .. })
    }
}
