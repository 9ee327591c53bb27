//! Chat event interpretation
//!
//! Every frame payload is a JSON object discriminated by `type`:
//! `token` (text to append), `tool` (tool status and result data) or `done`.

mod tool;

pub use tool::{ChartSpec, ECHARTS_CHART_TYPE, ToolPayload, ToolStatus};

use crate::error::{StreamDocError, StreamDocResult};
use serde::{Deserialize, Serialize};

/// A classified event from the chat stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatEvent {
    /// Text (markdown) to append to the document
    Token { text: String },
    /// A tool status transition
    Tool(ToolPayload),
    /// End of meaningful content
    Done,
}

impl ChatEvent {
    /// Create a token event
    pub fn token(text: impl Into<String>) -> Self {
        Self::Token { text: text.into() }
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::Tool(_) => "tool",
            Self::Done => "done",
        }
    }
}

/// Parse and classify a single frame payload.
///
/// Malformed JSON, a missing or unknown `type`, and a token without string
/// `text` yield a `Protocol` error; callers skip the frame and keep going.
/// Tool events are lenient: a missing or odd `name`/`status` still produces a
/// tool event with an `Unknown` status.
pub fn interpret(payload: &str) -> StreamDocResult<ChatEvent> {
    serde_json::from_str::<ChatEvent>(payload).map_err(|e| {
        StreamDocError::protocol(format!("Unrecognised frame payload: {}", e))
            .with_context(preview(payload))
    })
}

fn preview(payload: &str) -> String {
    const MAX_CHARS: usize = 80;
    if payload.chars().count() <= MAX_CHARS {
        return payload.to_string();
    }
    let head: String = payload.chars().take(MAX_CHARS).collect();
    format!("{}…", head)
}
