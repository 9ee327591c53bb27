//! Tool payloads carried by `tool` events

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Chart descriptor type understood by the chart renderer
pub const ECHARTS_CHART_TYPE: &str = "echarts";

/// Execution status reported for a tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Running,
    Success,
    Error,
    /// Any status this client does not know, including a missing one
    #[serde(other)]
    #[default]
    Unknown,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    fn from_wire(value: &Value) -> Self {
        match value.as_str() {
            Some("running") => Self::Running,
            Some("success") => Self::Success,
            Some("error") => Self::Error,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tool status transition with its (opaque) result data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPayload {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ToolStatus,
    #[serde(default)]
    pub data: Value,
}

impl ToolPayload {
    pub fn new(name: impl Into<String>, status: ToolStatus, data: Value) -> Self {
        Self {
            name: name.into(),
            status,
            data,
        }
    }

    /// The chart descriptor in `data.chart`, if it names an ECharts option.
    ///
    /// Only `chart.type` and `chart.option` are inspected; a null, false,
    /// zero or empty-string option counts as absent.
    pub fn echarts_spec(&self) -> Option<ChartSpec<'_>> {
        let chart = self.data.get("chart")?;
        if chart.get("type").and_then(Value::as_str) != Some(ECHARTS_CHART_TYPE) {
            return None;
        }
        let option = chart.get("option").filter(|option| is_present(option))?;
        Some(ChartSpec {
            chart_type: ECHARTS_CHART_TYPE,
            option,
        })
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Non-string names become empty rather than rejecting the event
fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

/// Null, numeric or unrecognised statuses map to `Unknown`
fn lenient_status<'de, D>(deserializer: D) -> Result<ToolStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(ToolStatus::from_wire(&value))
}

/// Borrowed view of a chart descriptor inside a tool payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSpec<'a> {
    pub chart_type: &'a str,
    pub option: &'a Value,
}
