//! Deferred rendering of tool slots
//!
//! Rendering happens in two phases. The session first commits a document
//! snapshot to the presenter, which materialises one mount point per slot.
//! Only then does the dispatcher drain its queue and render each newly
//! appended slot into its mount point.

mod dispatcher;
mod presenter;
mod view;

pub use dispatcher::{PendingRender, RenderDispatcher, RenderPass};
pub use presenter::{
    ChartRenderer, MemoryChartRenderer, MemoryMount, MemoryPresenter, MountPoint, Presenter,
    RichTextRenderer,
};
pub use view::{TOOL_RUNNING_TEXT, TOOL_UNMATCHED_TEXT, ToolView, select_view};
