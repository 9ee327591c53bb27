//! Terminal presenter
//!
//! Keeps the latest document snapshot, renders text segments through the
//! markdown renderer and owns one [`TerminalMount`] per tool slot.

use crate::markdown::MarkdownRenderer;
use colored::*;
use std::collections::BTreeMap;
use streamdoc_core::{
    DocumentSnapshot, MountPoint, Presenter, RichTextRenderer, Segment, SlotId,
};

/// Tool card content for one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalMount {
    tool: String,
    status: String,
    body: Option<String>,
}

impl TerminalMount {
    pub fn new(tool: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            status: status.into(),
            body: None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Card header plus the indented body
    pub fn render(&self) -> String {
        let header = format!("⚙ {} [{}]", self.tool, self.status);
        let mut out = header.cyan().bold().to_string();
        if let Some(body) = &self.body {
            for line in body.lines() {
                out.push('\n');
                out.push_str(&"│ ".bright_black().to_string());
                out.push_str(line);
            }
        }
        out
    }
}

impl MountPoint for TerminalMount {
    fn set_text(&mut self, text: &str) {
        self.body = Some(text.to_string());
    }
}

#[derive(Debug, Clone)]
struct TextBlock {
    source: String,
    rendered: String,
}

/// Presenter that renders the document for a terminal
pub struct TerminalPresenter {
    markdown: MarkdownRenderer,
    raw: bool,
    snapshot: DocumentSnapshot,
    blocks: Vec<Option<TextBlock>>,
    mounts: BTreeMap<SlotId, TerminalMount>,
}

impl TerminalPresenter {
    pub fn new(width: usize) -> Self {
        Self {
            markdown: MarkdownRenderer::new(width),
            raw: false,
            snapshot: DocumentSnapshot::default(),
            blocks: Vec::new(),
            mounts: BTreeMap::new(),
        }
    }

    /// Print text segments verbatim and slots as their HTML markers
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn snapshot(&self) -> &DocumentSnapshot {
        &self.snapshot
    }

    pub fn mount(&self, slot_id: SlotId) -> Option<&TerminalMount> {
        self.mounts.get(&slot_id)
    }

    /// The whole document as terminal output
    pub fn render_document(&self) -> String {
        let mut parts = Vec::with_capacity(self.snapshot.len());
        for (index, segment) in self.snapshot.segments().iter().enumerate() {
            match segment {
                Segment::Text(text) if self.raw => parts.push(text.content.clone()),
                Segment::Text(text) => match self.blocks.get(index).and_then(Option::as_ref) {
                    Some(block) => parts.push(block.rendered.clone()),
                    None => parts.push(self.markdown.render(&text.content)),
                },
                Segment::Slot(slot) if self.raw => parts.push(slot.marker_html()),
                Segment::Slot(slot) => match self.mounts.get(&slot.slot_id) {
                    Some(mount) => parts.push(mount.render()),
                    None => parts.push(
                        TerminalMount::new(&slot.tool.name, slot.tool.status.as_str()).render(),
                    ),
                },
            }
        }
        let separator = if self.raw { "" } else { "\n\n" };
        parts.join(separator)
    }
}

impl Presenter for TerminalPresenter {
    type Mount = TerminalMount;

    fn commit(&mut self, snapshot: &DocumentSnapshot) {
        self.snapshot = snapshot.clone();
        self.blocks.resize(snapshot.len(), None);

        // Only the trailing text segment normally changes between commits.
        for (index, segment) in snapshot.segments().iter().enumerate() {
            match segment {
                Segment::Text(text) => {
                    let stale = self.blocks[index]
                        .as_ref()
                        .is_none_or(|block| block.source != text.content);
                    if stale && !self.raw {
                        self.blocks[index] = Some(TextBlock {
                            source: text.content.clone(),
                            rendered: self.markdown.render(&text.content),
                        });
                    }
                }
                Segment::Slot(_) => self.blocks[index] = None,
            }
        }

        self.mounts
            .retain(|id, _| snapshot.slots().any(|slot| slot.slot_id == *id));
        for slot in snapshot.slots() {
            self.mounts.entry(slot.slot_id).or_insert_with(|| {
                TerminalMount::new(&slot.tool.name, slot.tool.status.as_str())
            });
        }
    }

    fn mount_point(&mut self, slot_id: SlotId) -> Option<&mut TerminalMount> {
        self.mounts.get_mut(&slot_id)
    }
}
