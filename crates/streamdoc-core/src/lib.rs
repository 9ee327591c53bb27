//! streamdoc core library
//!
//! Incremental client-side handling of a chat event stream that mixes
//! markdown tokens with tool results. Bytes arrive from a [`transport`],
//! are split into frames by [`frame`], classified by [`event`], assembled
//! into an ordered [`document`], and tool slots are resolved by the deferred
//! [`render`] dispatcher once the presentation layer has committed them.
//! [`session`] ties the pipeline together.

pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod frame;
pub mod render;
pub mod session;
pub mod transport;

pub use config::{ClientConfig, ConfigOverlay, LoggingConfig, RenderConfig};
pub use document::{DocumentAssembler, DocumentSnapshot, Segment, SlotId, SlotSegment, TextSegment};
pub use error::{StreamDocError, StreamDocResult, UnifiedError};
pub use event::{ChatEvent, ToolPayload, ToolStatus};
pub use frame::FrameDecoder;
pub use render::{
    ChartRenderer, MountPoint, Presenter, RenderDispatcher, RichTextRenderer, ToolView,
};
pub use session::{ChatSession, SessionEnd, SessionSummary};
pub use transport::{ChatRequest, ChatTransport, HttpTransport};
