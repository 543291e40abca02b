//! Terminal chart surface
//!
//! Draws a [`ChartSpec`] as horizontal text bars.

use crate::chart::{self, ChartSpec};
use crate::dashboard::ViewState;

/// Shown instead of the chart while a fetch is outstanding
pub const LOADING_PLACEHOLDER: &str = "Loading analytics...";

const BAR_CHAR: char = '█';

/// Draw a chart with bars scaled to `width` columns at the top tick
pub fn draw(spec: &ChartSpec, width: usize) -> String {
    let width = width.max(10);
    let ticks = spec.ticks();
    let top = ticks.last().copied().unwrap_or(1).max(1);
    let gutter = spec.bars.iter().map(|b| b.label.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&spec.title);
    out.push('\n');

    for bar in &spec.bars {
        let len = scale(bar.value, top, width);
        out.push_str(&format!(
            "{:<gutter$} │{} {}\n",
            bar.label,
            BAR_CHAR.to_string().repeat(len),
            bar.value,
            gutter = gutter
        ));
    }

    out.push_str(&format!("{:gutter$} └{}\n", "", "─".repeat(width), gutter = gutter));
    out.push_str(&format!("{:gutter$}  {}\n", "", tick_line(&ticks, top, width), gutter = gutter));
    out
}

/// Draw the dashboard for a view state, or the placeholder while loading
pub fn draw_view(state: &ViewState, width: usize) -> String {
    if state.loading {
        return format!("{}\n", LOADING_PLACEHOLDER);
    }

    let spec = chart::render(&state.counts, &state.filter);
    let mut out = draw(&spec, width);

    if state.is_idle() {
        out.push_str("No company selected. Enter a company name to scope the chart.\n");
    }
    if let Some(error) = &state.last_error {
        out.push_str(&format!("! Refresh failed, showing previous data: {}\n", error));
    }
    if let Some(updated) = state.updated_at {
        out.push_str(&format!("Last updated: {}\n", updated.format("%H:%M:%S")));
    }
    out
}

fn scale(value: u64, top: u64, width: usize) -> usize {
    let len = (value as f64 / top as f64 * width as f64).round() as usize;
    len.min(width)
}

/// Tick labels placed under their column; labels that would collide are skipped
fn tick_line(ticks: &[u64], top: u64, width: usize) -> String {
    let mut line: Vec<char> = vec![' '; width + 12];
    let mut next_free = 0;

    for &tick in ticks {
        let label = tick.to_string();
        let pos = scale(tick, top, width);
        if pos < next_free || pos + label.len() > line.len() {
            continue;
        }
        for (i, c) in label.chars().enumerate() {
            line[pos + i] = c;
        }
        next_free = pos + label.len() + 1;
    }

    line.into_iter().collect::<String>().trim_end().to_string()
}
