//! Plain-text rendering of a [`WeatherModel`].

use crate::models::{ChartModel, WeatherModel};

const FULL_BAR: char = '█';
const NEGATIVE_BAR: char = '░';

/// Render the model: error line, current block, daily list, then the chart.
/// `chart_width` is the length of the longest bar.
pub fn render(model: &WeatherModel, chart_width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !model.error_message().is_empty() {
        lines.push(model.error_message().to_string());
    }

    if model.has_data() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(model.current_lines().iter().map(|l| l.to_string()));
    }

    if !model.forecast().is_empty() {
        lines.push(String::new());
        lines.push("Forecast:".to_string());
        let units = model.chart().units();
        for row in model.forecast() {
            lines.push(format!(
                "  {}  {} / {} {}  {}  {}%",
                row.date,
                row.temp_min,
                row.temp_max,
                units.temperature_suffix(),
                row.desc,
                row.pop
            ));
        }
    }

    let chart = model.chart();
    if !chart.data_points().is_empty() {
        lines.push(String::new());
        lines.push(format!("Chart: {}", chart.graph_type().as_str()));
        lines.extend(chart_lines(chart, chart_width));
    }

    lines.join("\n")
}

/// One bar per hour label, scaled to the largest absolute value.
fn chart_lines(chart: &ChartModel, width: usize) -> Vec<String> {
    let max_abs = chart
        .data_points()
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let label_width = chart.times().iter().map(|t| t.len()).max().unwrap_or(0);

    chart
        .times()
        .iter()
        .zip(chart.data_points())
        .map(|(time, value)| {
            let length = if max_abs > 0.0 {
                ((value.abs() / max_abs) * width as f64).round() as usize
            } else {
                0
            };
            let fill = if *value < 0.0 { NEGATIVE_BAR } else { FULL_BAR };
            let bar: String = std::iter::repeat(fill).take(length).collect();
            format!("{:>w$} |{} {:.1}", time, bar, value, w = label_width)
        })
        .collect()
}
