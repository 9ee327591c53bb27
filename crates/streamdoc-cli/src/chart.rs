//! Terminal chart renderer for ECharts options
//!
//! Understands the common category chart shape: `xAxis.data` (or
//! `yAxis.data`) as labels and `series[*].data` as numbers. Anything else is
//! shown as a JSON dump of the option.

use crate::presenter::TerminalMount;
use serde_json::Value;
use streamdoc_core::{ChartRenderer, MountPoint, StreamDocResult};
use unicode_width::UnicodeWidthStr;

const BAR: char = '█';

#[derive(Debug, Clone)]
pub struct TerminalChartRenderer {
    width: usize,
}

struct Series<'a> {
    name: Option<&'a str>,
    values: Vec<f64>,
}

impl TerminalChartRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Draw the option as horizontal bars, or `None` for unsupported shapes
    pub fn draw(&self, option: &Value) -> Option<String> {
        let labels = category_labels(option)?;
        let series = parse_series(option)?;
        if labels.is_empty() || series.iter().any(|s| s.values.len() != labels.len()) {
            return None;
        }

        let max = series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0_f64, f64::max);
        let label_width = labels.iter().map(|l| l.width()).max().unwrap_or(0);
        let value_texts: Vec<Vec<String>> = series
            .iter()
            .map(|s| s.values.iter().map(|v| format_value(*v)).collect())
            .collect();
        let value_width = value_texts
            .iter()
            .flatten()
            .map(|v| v.len())
            .max()
            .unwrap_or(0);
        let bar_room = self
            .width
            .saturating_sub(label_width + value_width + 2)
            .max(1);

        let mut lines = Vec::new();
        if let Some(title) = option.pointer("/title/text").and_then(Value::as_str) {
            lines.push(title.to_string());
        }
        for (index, s) in series.iter().enumerate() {
            if series.len() > 1 {
                lines.push(format!("[{}]", s.name.unwrap_or("series")));
            }
            for (row, label) in labels.iter().enumerate() {
                let value = s.values[row];
                let bar_len = if max > 0.0 && value > 0.0 {
                    ((value / max) * bar_room as f64).round().max(1.0) as usize
                } else {
                    0
                };
                let padding = " ".repeat(label_width - label.width());
                lines.push(format!(
                    "{}{} {} {}",
                    label,
                    padding,
                    BAR.to_string().repeat(bar_len),
                    value_texts[index][row]
                ));
            }
        }
        Some(lines.join("\n"))
    }
}

fn category_labels(option: &Value) -> Option<Vec<String>> {
    ["/xAxis/data", "/yAxis/data", "/xAxis/0/data", "/yAxis/0/data"]
        .iter()
        .find_map(|pointer| option.pointer(pointer).and_then(Value::as_array))
        .map(|items| items.iter().map(label_text).collect())
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("value")
            .map(label_text)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

fn parse_series(option: &Value) -> Option<Vec<Series<'_>>> {
    let series = match option.get("series")? {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        single @ Value::Object(_) => vec![single],
        _ => return None,
    };
    if series.is_empty() {
        return None;
    }
    series
        .into_iter()
        .map(|s| {
            let values = s
                .get("data")?
                .as_array()?
                .iter()
                .map(numeric)
                .collect::<Option<Vec<f64>>>()?;
            Some(Series {
                name: s.get("name").and_then(Value::as_str),
                values,
            })
        })
        .collect()
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => map.get("value").and_then(numeric),
        _ => None,
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

impl ChartRenderer<TerminalMount> for TerminalChartRenderer {
    fn render(&self, mount: &mut TerminalMount, option: &Value) -> StreamDocResult<()> {
        match self.draw(option) {
            Some(chart) => mount.set_text(&chart),
            None => {
                tracing::debug!("unsupported chart option shape, dumping JSON");
                mount.set_text(&serde_json::to_string_pretty(option)?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sales_option() -> Value {
        json!({
            "title": {"text": "各品类销售额Top5"},
            "tooltip": {},
            "xAxis": {"type": "category", "data": ["电子产品", "食品饮料", "TV"]},
            "yAxis": {"type": "value"},
            "series": [{"type": "bar", "data": [15230.5, 12560.2, 0]}]
        })
    }

    #[test]
    fn test_draws_bar_chart() {
        let chart = TerminalChartRenderer::new(40).draw(&sales_option()).unwrap();
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0], "各品类销售额Top5");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("电子产品 █"));
        assert!(lines[1].ends_with("15230.5"));
        // Labels are padded to the same display width.
        assert!(lines[3].starts_with("TV       "));
        assert!(lines[3].ends_with(" 0"));
        assert!(!lines[3].contains(BAR));

        let longest = lines[1].matches(BAR).count();
        let shorter = lines[2].matches(BAR).count();
        assert!(longest > shorter && shorter > 0);
    }

    #[test]
    fn test_object_data_points() {
        let option = json!({
            "yAxis": {"data": ["a", "b"]},
            "series": {"name": "s", "data": [{"value": 1}, {"value": 2}]}
        });
        let chart = TerminalChartRenderer::new(30).draw(&option).unwrap();
        assert_eq!(chart.lines().count(), 2);
    }

    #[test]
    fn test_multiple_series_are_labelled() {
        let option = json!({
            "xAxis": {"data": ["q1", "q2"]},
            "series": [{"name": "2023", "data": [1, 2]}, {"name": "2024", "data": [3, 4]}]
        });
        let chart = TerminalChartRenderer::new(30).draw(&option).unwrap();
        assert!(chart.contains("[2023]"));
        assert!(chart.contains("[2024]"));
    }

    #[test]
    fn test_unsupported_shape_falls_back_to_json() {
        let renderer = TerminalChartRenderer::new(40);
        let option = json!({"series": [{"type": "pie", "data": [{"name": "a", "value": 1}]}]});
        assert!(renderer.draw(&option).is_none());

        let mut mount = TerminalMount::new("db_query", "success");
        renderer.render(&mut mount, &option).unwrap();
        assert!(mount.body().unwrap().contains("\"pie\""));
    }

    #[test]
    fn test_mismatched_lengths_are_unsupported() {
        let option = json!({"xAxis": {"data": ["a"]}, "series": [{"data": [1, 2]}]});
        assert!(TerminalChartRenderer::new(40).draw(&option).is_none());
    }
}
