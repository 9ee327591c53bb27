//! Deferred render dispatcher

use super::presenter::{ChartRenderer, MountPoint, Presenter};
use super::view::{ToolView, select_view};
use crate::document::{SlotId, SlotSegment};
use crate::event::ToolPayload;
use std::collections::VecDeque;

/// A slot waiting for its first render pass
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRender {
    pub slot_id: SlotId,
    pub tool: ToolPayload,
}

impl From<SlotSegment> for PendingRender {
    fn from(slot: SlotSegment) -> Self {
        Self {
            slot_id: slot.slot_id,
            tool: slot.tool,
        }
    }
}

/// Outcome of one dispatcher pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderPass {
    /// Slots rendered into a mount point
    pub rendered: usize,
    /// Slots whose mount point did not exist
    pub dropped: usize,
    /// Slots whose chart renderer failed
    pub failed: usize,
}

impl RenderPass {
    pub fn is_empty(&self) -> bool {
        self.rendered == 0 && self.dropped == 0 && self.failed == 0
    }
}

/// Owns the pending render queue for one session
#[derive(Debug, Default)]
pub struct RenderDispatcher {
    queue: VecDeque<PendingRender>,
}

impl RenderDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, pending: impl Into<PendingRender>) {
        self.queue.push_back(pending.into());
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn reset(&mut self) {
        self.queue.clear();
    }

    /// Drain the queue, rendering each slot whose mount point exists.
    ///
    /// Entries without a mount point are dropped, never re-queued.
    pub fn run_pass<P, C>(&mut self, presenter: &mut P, chart: &C) -> RenderPass
    where
        P: Presenter,
        C: ChartRenderer<P::Mount> + ?Sized,
    {
        let mut pass = RenderPass::default();

        for PendingRender { slot_id, tool } in self.queue.drain(..) {
            let Some(mount) = presenter.mount_point(slot_id) else {
                tracing::trace!(slot_id, tool = %tool.name, "no mount point, dropping render");
                pass.dropped += 1;
                continue;
            };

            let view = select_view(&tool);
            match view {
                ToolView::Chart(option) => {
                    if let Err(e) = chart.render(mount, option) {
                        tracing::warn!(slot_id, tool = %tool.name, "chart render failed: {}", e);
                        pass.failed += 1;
                        continue;
                    }
                }
                _ => {
                    if let Some(text) = view.text() {
                        mount.set_text(&text);
                    }
                }
            }
            pass.rendered += 1;
        }

        pass
    }
}
