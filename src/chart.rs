//! Chart Renderer
//!
//! Turns a count record into a renderer-agnostic bar chart description.
//! Pure: no I/O, and equal inputs always give equal specs.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::analytics::{AnalyticsCounts, Sentiment};

/// Dataset label shown in tooltips
pub const DATASET_LABEL: &str = "Feedback Count";

/// Title used when no company is selected
pub const GLOBAL_TITLE: &str = "Global Analytics";

const FILL_ALPHA: f32 = 0.6;
const BORDER_ALPHA: f32 = 1.0;

/// Preferred number of y-axis intervals
const TARGET_TICKS: u64 = 5;

/// An RGBA color, serialized in CSS `rgba()` form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed color per category
pub fn color_for(sentiment: Sentiment) -> Rgba {
    match sentiment {
        Sentiment::Positive => Rgba::opaque(75, 192, 192),  // teal
        Sentiment::Negative => Rgba::opaque(255, 99, 132),  // red
        Sentiment::Neutral => Rgba::opaque(255, 206, 86),   // yellow
    }
}

/// One bar of the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub sentiment: Sentiment,
    pub label: String,
    pub value: u64,
    pub background: Rgba,
    pub border: Rgba,
}

/// Y-axis configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YAxis {
    pub begin_at_zero: bool,
    /// Decimal places shown on tick labels
    pub precision: u8,
}

impl Default for YAxis {
    fn default() -> Self {
        Self {
            begin_at_zero: true,
            precision: 0,
        }
    }
}

impl YAxis {
    /// Tick values covering `0..=max`.
    ///
    /// Steps are whole numbers from the 1-2-5 series, so no tick is ever
    /// fractional. The last tick is at least `max`, clamped to `u64::MAX`.
    pub fn ticks(&self, max: u64) -> Vec<u64> {
        let step = tick_step(max);
        let mut ticks = vec![0];
        let mut current: u64 = 0;
        while current < max.max(1) {
            current = current.saturating_add(step);
            ticks.push(current);
        }
        ticks
    }
}

fn tick_step(max: u64) -> u64 {
    let raw = max.div_ceil(TARGET_TICKS).max(1);

    let mut magnitude = 1u64;
    while magnitude.saturating_mul(10) <= raw {
        magnitude *= 10;
    }

    [1u64, 2, 5, 10]
        .iter()
        .filter_map(|m| m.checked_mul(magnitude))
        .find(|step| *step >= raw)
        .unwrap_or(u64::MAX)
}

/// Renderable bar chart description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub dataset_label: String,
    /// Always Positive, Negative, Neutral in that order
    pub bars: Vec<Bar>,
    pub border_width: u32,
    pub show_legend: bool,
    pub y_axis: YAxis,
}

impl ChartSpec {
    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<u64> {
        self.bars.iter().map(|b| b.value).collect()
    }

    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }

    /// Y-axis ticks for this chart's data
    pub fn ticks(&self) -> Vec<u64> {
        self.y_axis.ticks(self.max_value())
    }
}

/// Chart title for a company label
pub fn title_for(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        GLOBAL_TITLE.to_string()
    } else {
        format!("Analytics for {}", label)
    }
}

/// Build the chart for a count record.
///
/// Callers show a loading placeholder instead while a fetch is outstanding.
pub fn render(counts: &AnalyticsCounts, label: &str) -> ChartSpec {
    let bars = Sentiment::ALL
        .iter()
        .map(|&sentiment| {
            let color = color_for(sentiment);
            Bar {
                sentiment,
                label: sentiment.label().to_string(),
                value: sentiment.count_in(counts),
                background: color.with_alpha(FILL_ALPHA),
                border: color.with_alpha(BORDER_ALPHA),
            }
        })
        .collect();

    ChartSpec {
        title: title_for(label),
        dataset_label: DATASET_LABEL.to_string(),
        bars,
        border_width: 1,
        show_legend: false,
        y_axis: YAxis::default(),
    }
}
