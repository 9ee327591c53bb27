//! Document segments

use crate::event::ToolPayload;
use serde::{Deserialize, Serialize};

/// Session-scoped slot identifier, assigned 0, 1, 2, ...
pub type SlotId = u64;

/// Accumulated markdown text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub content: String,
}

/// Placeholder for a tool result that is rendered after the document is committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSegment {
    pub slot_id: SlotId,
    pub tool: ToolPayload,
}

impl SlotSegment {
    /// Element id of the mount point a presentation layer creates for this slot
    pub fn mount_id(&self) -> String {
        mount_id(self.slot_id)
    }

    /// HTML marker for the slot: a tool card wrapping an empty mount element
    pub fn marker_html(&self) -> String {
        format!(
            r#"<div class="tool-card" data-tool="{}" data-status="{}"><div id="{}"></div></div>"#,
            escape_attr(&self.tool.name),
            self.tool.status,
            self.mount_id()
        )
    }
}

/// Element id used for the mount point of `slot_id`
pub fn mount_id(slot_id: SlotId) -> String {
    format!("tool-container-{}", slot_id)
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One unit of the assembled document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Text(TextSegment),
    Slot(SlotSegment),
}

impl Segment {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(TextSegment {
            content: content.into(),
        })
    }

    pub fn slot(slot_id: SlotId, tool: ToolPayload) -> Self {
        Self::Slot(SlotSegment { slot_id, tool })
    }

    pub fn as_text(&self) -> Option<&TextSegment> {
        match self {
            Self::Text(text) => Some(text),
            Self::Slot(_) => None,
        }
    }

    pub fn as_slot(&self) -> Option<&SlotSegment> {
        match self {
            Self::Slot(slot) => Some(slot),
            Self::Text(_) => None,
        }
    }
}
