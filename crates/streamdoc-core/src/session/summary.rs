//! Session results

use crate::render::RenderPass;

/// Counters gathered over one completed session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Frames that decoded to a valid event
    pub frames: usize,
    /// Frames skipped as malformed or unrecognised
    pub ignored_frames: usize,
    /// Segments in the final document
    pub segments: usize,
    /// Slots assigned during the session
    pub slots: u64,
    /// Whether a `done` event arrived
    pub saw_done: bool,
    /// Bytes left in the decoder when the stream ended
    pub trailing_bytes: usize,
    /// Render results summed over every pass
    pub renders: RenderPass,
}

/// How a call to `ChatSession::start` ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The transport reached end-of-stream
    Completed(SessionSummary),
    /// A newer session or an explicit cancel took over
    Superseded,
}

impl SessionEnd {
    pub fn summary(&self) -> Option<&SessionSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}
