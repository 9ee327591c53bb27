//! Document assembler: applies classified events to the segment list

use super::DocumentSnapshot;
use super::segment::{Segment, SlotId, SlotSegment, TextSegment};
use crate::event::{ChatEvent, ToolPayload};
use std::sync::Arc;

/// What applying an event did to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The trailing text segment was extended
    TextExtended,
    /// A new text segment was appended
    TextAppended,
    /// A new slot was appended and must be queued for rendering
    SlotAppended(SlotSegment),
    /// `done` was received; the document is unchanged
    Done,
}

impl Applied {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Done)
    }
}

/// Owns the document and the slot counter for one session
#[derive(Debug, Default)]
pub struct DocumentAssembler {
    segments: Arc<Vec<Segment>>,
    next_slot_id: SlotId,
    revision: u64,
    done: bool,
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to an empty document with the slot counter back at 0
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply one event.
    ///
    /// Segments are copied on write: if a snapshot still shares the list, the
    /// list is cloned first, so handed-out snapshots never change.
    pub fn apply(&mut self, event: ChatEvent) -> Applied {
        let applied = match event {
            ChatEvent::Token { text } => self.append_text(text),
            ChatEvent::Tool(tool) => self.append_slot(tool),
            ChatEvent::Done => {
                self.done = true;
                return Applied::Done;
            }
        };
        self.revision += 1;
        applied
    }

    fn append_text(&mut self, text: String) -> Applied {
        let segments = Arc::make_mut(&mut self.segments);
        if let Some(Segment::Text(last)) = segments.last_mut() {
            let mut content = String::with_capacity(last.content.len() + text.len());
            content.push_str(&last.content);
            content.push_str(&text);
            *last = TextSegment { content };
            return Applied::TextExtended;
        }
        segments.push(Segment::Text(TextSegment { content: text }));
        Applied::TextAppended
    }

    fn append_slot(&mut self, tool: ToolPayload) -> Applied {
        let slot = SlotSegment {
            slot_id: self.next_slot_id,
            tool,
        };
        self.next_slot_id += 1;
        Arc::make_mut(&mut self.segments).push(Segment::Slot(slot.clone()));
        Applied::SlotAppended(slot)
    }

    /// Read-only view of the current document
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot::new(Arc::clone(&self.segments), self.revision)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The id the next tool event will receive
    pub fn next_slot_id(&self) -> SlotId {
        self.next_slot_id
    }

    /// Whether a `done` event has been applied since the last reset
    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ToolStatus;
    use serde_json::json;

    fn tool(name: &str, status: ToolStatus) -> ChatEvent {
        ChatEvent::Tool(ToolPayload::new(name, status, json!({})))
    }

    #[test]
    fn test_tokens_merge_into_one_segment() {
        let mut assembler = DocumentAssembler::new();
        let parts = ["正在", "处理", " your ", "request"];
        for (i, part) in parts.iter().enumerate() {
            let applied = assembler.apply(ChatEvent::token(*part));
            let expected = if i == 0 {
                Applied::TextAppended
            } else {
                Applied::TextExtended
            };
            assert_eq!(applied, expected);
        }

        let snapshot = assembler.snapshot();
        assert_eq!(snapshot.segments(), &[Segment::text(parts.concat())]);
    }

    #[test]
    fn test_tool_always_appends_new_slot() {
        let mut assembler = DocumentAssembler::new();
        assembler.apply(ChatEvent::token("intro"));

        for (expected_id, status) in [ToolStatus::Running, ToolStatus::Success, ToolStatus::Success]
            .into_iter()
            .enumerate()
        {
            let before = assembler.len();
            match assembler.apply(tool("db_query", status)) {
                Applied::SlotAppended(slot) => assert_eq!(slot.slot_id, expected_id as u64),
                other => panic!("expected slot, got {:?}", other),
            }
            assert_eq!(assembler.len(), before + 1);
        }
        assert_eq!(assembler.next_slot_id(), 3);
    }

    #[test]
    fn test_token_after_slot_starts_new_segment() {
        let mut assembler = DocumentAssembler::new();
        assembler.apply(ChatEvent::token("a"));
        assembler.apply(tool("html_validate", ToolStatus::Running));
        assert_eq!(assembler.apply(ChatEvent::token("b")), Applied::TextAppended);
        assembler.apply(ChatEvent::token("c"));

        let snapshot = assembler.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.segments()[2], Segment::text("bc"));
        assert_eq!(snapshot.plain_text(), "abc");
    }

    #[test]
    fn test_no_adjacent_text_segments() {
        let mut assembler = DocumentAssembler::new();
        let events = [
            ChatEvent::token("x"),
            ChatEvent::token("y"),
            tool("db_query", ToolStatus::Running),
            tool("db_query", ToolStatus::Success),
            ChatEvent::token("z"),
            ChatEvent::Done,
            ChatEvent::token("w"),
        ];
        for event in events {
            assembler.apply(event);
        }
        let snapshot = assembler.snapshot();
        for pair in snapshot.segments().windows(2) {
            assert!(!(pair[0].as_text().is_some() && pair[1].as_text().is_some()));
        }
        assert_eq!(snapshot.len(), 4);
    }

    #[test]
    fn test_earlier_snapshots_are_not_mutated() {
        let mut assembler = DocumentAssembler::new();
        assembler.apply(ChatEvent::token("Hello "));
        let before = assembler.snapshot();

        assembler.apply(ChatEvent::token("world"));
        assembler.apply(tool("db_query", ToolStatus::Running));
        let after = assembler.snapshot();

        assert_eq!(before.segments(), &[Segment::text("Hello ")]);
        assert_eq!(before.revision(), 1);
        assert_eq!(after.len(), 2);
        assert_eq!(after.revision(), 3);
    }

    #[test]
    fn test_done_does_not_mutate() {
        let mut assembler = DocumentAssembler::new();
        assembler.apply(ChatEvent::token("a"));
        let revision = assembler.snapshot().revision();

        let applied = assembler.apply(ChatEvent::Done);
        assert!(!applied.is_mutation());
        assert!(assembler.is_done());
        assert_eq!(assembler.snapshot().revision(), revision);
        assert_eq!(assembler.len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut assembler = DocumentAssembler::new();
        assembler.apply(ChatEvent::token("a"));
        assembler.apply(tool("db_query", ToolStatus::Running));
        assembler.apply(ChatEvent::Done);

        assembler.reset();
        assert!(assembler.is_empty());
        assert_eq!(assembler.next_slot_id(), 0);
        assert!(!assembler.is_done());
        assert_eq!(assembler.snapshot(), DocumentSnapshot::default());
    }
}
