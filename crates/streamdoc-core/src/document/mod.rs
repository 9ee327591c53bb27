//! Ordered document assembled from chat events
//!
//! The assembler owns the segment list. Readers only ever see a
//! `DocumentSnapshot`, which is never mutated after it is handed out.

mod assembler;
mod segment;

pub use assembler::{Applied, DocumentAssembler};
pub use segment::{Segment, SlotId, SlotSegment, TextSegment, mount_id};

use std::sync::Arc;

/// Immutable view of the document at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSnapshot {
    segments: Arc<Vec<Segment>>,
    revision: u64,
}

impl DocumentSnapshot {
    pub(crate) fn new(segments: Arc<Vec<Segment>>, revision: u64) -> Self {
        Self { segments, revision }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of mutations applied before this snapshot was taken
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = &SlotSegment> {
        self.segments.iter().filter_map(Segment::as_slot)
    }

    /// All text content concatenated, slots omitted
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(Segment::as_text)
            .map(|t| t.content.as_str())
            .collect()
    }
}
