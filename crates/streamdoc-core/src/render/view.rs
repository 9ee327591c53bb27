//! Renderer selection for tool payloads

use crate::event::{ToolPayload, ToolStatus};
use serde_json::Value;

/// Placeholder shown while a tool is still running
pub const TOOL_RUNNING_TEXT: &str = "工具执行中…";

/// Placeholder for tool output no renderer claims
pub const TOOL_UNMATCHED_TEXT: &str = "未匹配的工具输出";

const DB_QUERY_TOOL: &str = "db_query";
const HTML_VALIDATE_TOOL: &str = "html_validate";

/// How a tool slot should be rendered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolView<'a> {
    /// Hand the ECharts option to the chart renderer
    Chart(&'a Value),
    /// Pretty-printed dump of the tool data
    Json(&'a Value),
    /// The fixed running placeholder
    Running,
    /// The fixed unmatched placeholder
    Unmatched,
}

impl ToolView<'_> {
    /// Text to place in the mount point, for every view except `Chart`
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Chart(_) => None,
            Self::Json(data) => Some(
                serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
            ),
            Self::Running => Some(TOOL_RUNNING_TEXT.to_string()),
            Self::Unmatched => Some(TOOL_UNMATCHED_TEXT.to_string()),
        }
    }
}

/// Pick the view for a tool payload; the match arms are in precedence order.
pub fn select_view(tool: &ToolPayload) -> ToolView<'_> {
    match (tool.name.as_str(), tool.status) {
        (DB_QUERY_TOOL, ToolStatus::Success) => match tool.echarts_spec() {
            Some(spec) => ToolView::Chart(spec.option),
            None => ToolView::Json(&tool.data),
        },
        (HTML_VALIDATE_TOOL, ToolStatus::Success) => ToolView::Json(&tool.data),
        (_, ToolStatus::Running) => ToolView::Running,
        _ => ToolView::Unmatched,
    }
}
