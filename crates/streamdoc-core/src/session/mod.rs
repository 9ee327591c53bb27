//! Session controller
//!
//! A `ChatSession` drives one request/response cycle at a time:
//! transport bytes → frame decoder → event interpreter → document assembler →
//! presenter commit → render pass. Starting a new session (or calling
//! [`ChatSession::cancel`]) abandons the one in flight; its remaining events
//! are discarded and never reach the new document.

mod state;
mod summary;

pub use summary::{SessionEnd, SessionSummary};

use crate::document::DocumentSnapshot;
use crate::error::StreamDocResult;
use crate::frame::FrameDecoder;
use crate::render::{ChartRenderer, Presenter};
use crate::transport::{ChatRequest, ChatTransport};
use futures::StreamExt;
use parking_lot::Mutex;
use state::SessionState;
use tokio_util::sync::CancellationToken;

/// Orchestrates chat sessions over a transport
pub struct ChatSession<T, P, C>
where
    P: Presenter,
{
    transport: T,
    chart: C,
    state: Mutex<SessionState<P>>,
}

impl<T, P, C> ChatSession<T, P, C>
where
    T: ChatTransport,
    P: Presenter,
    C: ChartRenderer<P::Mount>,
{
    pub fn new(transport: T, presenter: P, chart: C) -> Self {
        Self {
            transport,
            chart,
            state: Mutex::new(SessionState::new(presenter)),
        }
    }

    /// Run one session to completion.
    ///
    /// Returns `SessionEnd::Superseded` if another `start` or a `cancel`
    /// abandoned this one. A transport failure is returned as an error; the
    /// partially assembled document stays in place.
    pub async fn start(&self, request: ChatRequest) -> StreamDocResult<SessionEnd> {
        let (generation, cancel) = self.state.lock().begin();
        tracing::info!(generation, "chat session started");

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(SessionEnd::Superseded),
            opened = self.transport.open_stream(&request) => opened,
        };
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(generation, "failed to open chat stream: {}", e);
                return Err(e);
            }
        };

        let mut decoder = FrameDecoder::new();
        let mut summary = SessionSummary::default();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(generation, "chat session superseded");
                    return Ok(SessionEnd::Superseded);
                }
                next = stream.next() => next,
            };

            match next {
                None => break,
                Some(Err(e)) => {
                    if cancel.is_cancelled() {
                        return Ok(SessionEnd::Superseded);
                    }
                    tracing::warn!(
                        generation,
                        segments = self.state.lock().segments(),
                        "chat stream failed: {}",
                        e
                    );
                    return Err(e);
                }
                Some(Ok(chunk)) => {
                    let payloads = decoder.feed(&chunk);
                    if payloads.is_empty() {
                        continue;
                    }

                    let mut state = self.state.lock();
                    if state.generation() != generation {
                        return Ok(SessionEnd::Superseded);
                    }
                    for payload in payloads {
                        state.process(&payload, &self.chart, &mut summary);
                    }
                }
            }
        }

        if decoder.has_remaining() {
            summary.trailing_bytes = decoder.remaining_len();
            tracing::warn!(
                generation,
                bytes = summary.trailing_bytes,
                "stream ended inside an unterminated frame"
            );
        }

        let state = self.state.lock();
        if state.generation() != generation {
            return Ok(SessionEnd::Superseded);
        }
        state.finish(&mut summary);
        tracing::info!(
            generation,
            frames = summary.frames,
            ignored = summary.ignored_frames,
            segments = summary.segments,
            slots = summary.slots,
            saw_done = summary.saw_done,
            "chat session completed"
        );
        Ok(SessionEnd::Completed(summary))
    }

    /// Abandon the session in flight, keeping its document as it is
    pub fn cancel(&self) {
        self.state.lock().abandon();
    }

    /// Current document snapshot
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.state.lock().snapshot()
    }

    /// Inspect the presenter
    pub fn with_presenter<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(self.state.lock().presenter())
    }

    /// Token cancelled when the current session is abandoned
    pub fn cancellation_token(&self) -> CancellationToken {
        self.state.lock().cancellation_token()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests;
