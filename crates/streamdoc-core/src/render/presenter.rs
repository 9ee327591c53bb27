//! Collaborator interfaces for the presentation layer, plus an in-memory presenter

use crate::document::{DocumentSnapshot, SlotId};
use crate::error::StreamDocResult;
use serde_json::Value;
use std::collections::BTreeMap;

/// A live element a tool slot is rendered into
pub trait MountPoint {
    /// Replace the element's content with plain text
    fn set_text(&mut self, text: &str);
}

/// Presentation layer that consumes document snapshots
///
/// `commit` must materialise a mount point for every slot it wants rendered;
/// the dispatcher looks them up right after the commit.
pub trait Presenter: Send {
    type Mount: MountPoint;

    /// Make a new snapshot visible
    fn commit(&mut self, snapshot: &DocumentSnapshot);

    /// Look up the live mount point for a slot
    fn mount_point(&mut self, slot_id: SlotId) -> Option<&mut Self::Mount>;
}

/// Draws a declarative chart option into a mount point
pub trait ChartRenderer<M: ?Sized>: Send + Sync {
    fn render(&self, mount: &mut M, option: &Value) -> StreamDocResult<()>;
}

/// Pure conversion of markdown-like text into presentational output
pub trait RichTextRenderer {
    type Output;

    fn render(&self, markdown: &str) -> Self::Output;
}

/// Mount point held in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryMount {
    pub text: Option<String>,
    pub chart: Option<Value>,
    /// How many times anything was rendered into this mount
    pub renders: usize,
}

impl MountPoint for MemoryMount {
    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
        self.renders += 1;
    }
}

impl MemoryMount {
    pub fn set_chart(&mut self, option: &Value) {
        self.chart = Some(option.clone());
        self.renders += 1;
    }
}

/// Presenter that keeps the latest snapshot and its mount points in memory
#[derive(Debug, Clone)]
pub struct MemoryPresenter {
    snapshot: DocumentSnapshot,
    mounts: BTreeMap<SlotId, MemoryMount>,
    commits: usize,
    materialize: bool,
}

impl Default for MemoryPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPresenter {
    pub fn new() -> Self {
        Self {
            snapshot: DocumentSnapshot::default(),
            mounts: BTreeMap::new(),
            commits: 0,
            materialize: true,
        }
    }

    /// A presenter that never creates mount points, so every slot render is dropped
    pub fn without_mounts() -> Self {
        Self {
            materialize: false,
            ..Self::new()
        }
    }

    pub fn snapshot(&self) -> &DocumentSnapshot {
        &self.snapshot
    }

    pub fn mount(&self, slot_id: SlotId) -> Option<&MemoryMount> {
        self.mounts.get(&slot_id)
    }

    pub fn mounts(&self) -> &BTreeMap<SlotId, MemoryMount> {
        &self.mounts
    }

    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl Presenter for MemoryPresenter {
    type Mount = MemoryMount;

    fn commit(&mut self, snapshot: &DocumentSnapshot) {
        self.commits += 1;
        self.snapshot = snapshot.clone();
        // A new session restarts slot ids, so stale mounts must go.
        self.mounts
            .retain(|id, _| snapshot.slots().any(|slot| slot.slot_id == *id));
        if self.materialize {
            for slot in snapshot.slots() {
                self.mounts.entry(slot.slot_id).or_default();
            }
        }
    }

    fn mount_point(&mut self, slot_id: SlotId) -> Option<&mut MemoryMount> {
        self.mounts.get_mut(&slot_id)
    }
}

/// Chart renderer that stores the option in a `MemoryMount`
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryChartRenderer;

impl ChartRenderer<MemoryMount> for MemoryChartRenderer {
    fn render(&self, mount: &mut MemoryMount, option: &Value) -> StreamDocResult<()> {
        mount.set_chart(option);
        Ok(())
    }
}
