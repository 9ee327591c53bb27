//! streamdoc
//!
//! Turns a streamed chat answer (markdown tokens interleaved with tool
//! results) into a live document. This crate re-exports the core API and
//! adds [`connect`] for the common HTTP setup.
//!
//! ```no_run
//! use streamdoc::{connect, ChatRequest, ClientConfig, MemoryChartRenderer, MemoryPresenter};
//!
//! # async fn demo() -> streamdoc::StreamDocResult<()> {
//! let session = connect(&ClientConfig::default(), MemoryPresenter::new(), MemoryChartRenderer)?;
//! let end = session.start(ChatRequest::new("hello")).await?;
//! println!("{:?}", end.summary());
//! # Ok(())
//! # }
//! ```

pub use streamdoc_core::{
    ChartRenderer, ChatEvent, ChatRequest, ChatSession, ChatTransport, ClientConfig,
    DocumentAssembler, DocumentSnapshot, FrameDecoder, HttpTransport, LoggingConfig, MountPoint,
    Presenter, RenderConfig, RenderDispatcher, RichTextRenderer, Segment, SessionEnd,
    SessionSummary, SlotId, SlotSegment, StreamDocError, StreamDocResult, TextSegment,
    ToolPayload, ToolStatus, ToolView, UnifiedError,
};
pub use streamdoc_core::{config, document, error, event, frame, render, session, transport};
pub use streamdoc_core::render::{
    MemoryChartRenderer, MemoryMount, MemoryPresenter, TOOL_RUNNING_TEXT, TOOL_UNMATCHED_TEXT,
};

/// Build a session that talks to `config.endpoint` over HTTP
pub fn connect<P, C>(
    config: &ClientConfig,
    presenter: P,
    chart: C,
) -> StreamDocResult<ChatSession<HttpTransport, P, C>>
where
    P: Presenter,
    C: ChartRenderer<P::Mount>,
{
    let transport = HttpTransport::from_config(config)?;
    tracing::debug!(endpoint = %transport.endpoint(), "session connected");
    Ok(ChatSession::new(transport, presenter, chart))
}
