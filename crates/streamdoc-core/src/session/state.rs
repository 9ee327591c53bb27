//! Per-session mutable state, guarded by the session mutex

use super::summary::SessionSummary;
use crate::document::{Applied, DocumentAssembler, DocumentSnapshot};
use crate::event::{ChatEvent, interpret};
use crate::render::{ChartRenderer, Presenter, RenderDispatcher};
use tokio_util::sync::CancellationToken;

pub(super) struct SessionState<P> {
    generation: u64,
    cancel: CancellationToken,
    assembler: DocumentAssembler,
    dispatcher: RenderDispatcher,
    presenter: P,
}

impl<P: Presenter> SessionState<P> {
    pub(super) fn new(presenter: P) -> Self {
        Self {
            generation: 0,
            cancel: CancellationToken::new(),
            assembler: DocumentAssembler::new(),
            dispatcher: RenderDispatcher::new(),
            presenter,
        }
    }

    /// Abandon the previous session and reset everything for a new one
    pub(super) fn begin(&mut self) -> (u64, CancellationToken) {
        self.abandon();
        self.cancel = CancellationToken::new();
        self.assembler.reset();
        self.dispatcher.reset();
        self.presenter.commit(&self.assembler.snapshot());
        (self.generation, self.cancel.clone())
    }

    pub(super) fn abandon(&mut self) {
        self.generation += 1;
        self.cancel.cancel();
    }

    pub(super) fn generation(&self) -> u64 {
        self.generation
    }

    /// Interpret one frame payload and run both phases for it
    pub(super) fn process<C>(&mut self, payload: &str, chart: &C, summary: &mut SessionSummary)
    where
        C: ChartRenderer<P::Mount> + ?Sized,
    {
        let event = match interpret(payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!("ignoring frame: {}", e);
                summary.ignored_frames += 1;
                return;
            }
        };
        summary.frames += 1;
        tracing::trace!(kind = event.kind(), "applying event");

        if matches!(event, ChatEvent::Done) {
            self.assembler.apply(event);
            summary.saw_done = true;
            return;
        }

        if let Applied::SlotAppended(slot) = self.assembler.apply(event) {
            self.dispatcher.enqueue(slot);
        }

        // Phase 1: make the snapshot visible. Phase 2: resolve queued slots.
        self.presenter.commit(&self.assembler.snapshot());
        let pass = self.dispatcher.run_pass(&mut self.presenter, chart);
        summary.renders.rendered += pass.rendered;
        summary.renders.dropped += pass.dropped;
        summary.renders.failed += pass.failed;
    }

    pub(super) fn finish(&self, summary: &mut SessionSummary) {
        summary.segments = self.assembler.len();
        summary.slots = self.assembler.next_slot_id();
        summary.saw_done |= self.assembler.is_done();
    }

    pub(super) fn segments(&self) -> usize {
        self.assembler.len()
    }

    pub(super) fn snapshot(&self) -> DocumentSnapshot {
        self.assembler.snapshot()
    }

    pub(super) fn presenter(&self) -> &P {
        &self.presenter
    }

    pub(super) fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
