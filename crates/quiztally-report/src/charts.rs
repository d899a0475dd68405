//! SVG chart rendering.
//!
//! Three charts are drawn from an [`AggregationSnapshot`]: correct rate per
//! question, average score per group, and the distribution of incorrect
//! answers. A [`ChartBoard`] owns at most one rendered chart per kind and
//! releases the previous one before every re-render.

use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use quiztally_core::model::QuestionCatalog;
use quiztally_core::statistics::{AggregationSnapshot, ErrorShare, WEAK_TOPIC_THRESHOLD};

use crate::error::ExportError;
use crate::html::html_escape;

/// The charts quiztally can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    CorrectRate,
    GroupAverage,
    ErrorDistribution,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::CorrectRate,
        ChartKind::GroupAverage,
        ChartKind::ErrorDistribution,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::CorrectRate => "Question Correct Rate (%)",
            ChartKind::GroupAverage => "Group Average Score",
            ChartKind::ErrorDistribution => "Incorrect Answers Distribution",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            ChartKind::CorrectRate => "question_correct_rate.svg",
            ChartKind::GroupAverage => "group_average_score.svg",
            ChartKind::ErrorDistribution => "incorrect_answers_distribution.svg",
        }
    }

    fn slot(&self) -> usize {
        match self {
            ChartKind::CorrectRate => 0,
            ChartKind::GroupAverage => 1,
            ChartKind::ErrorDistribution => 2,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::CorrectRate => write!(f, "correct-rate"),
            ChartKind::GroupAverage => write!(f, "group-average"),
            ChartKind::ErrorDistribution => write!(f, "error-distribution"),
        }
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "correct-rate" | "rate" => Ok(ChartKind::CorrectRate),
            "group-average" | "average" | "avg" => Ok(ChartKind::GroupAverage),
            "error-distribution" | "errors" | "dist" => Ok(ChartKind::ErrorDistribution),
            other => Err(format!("unknown chart kind: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Chart handles
// ---------------------------------------------------------------------------

/// A rendered chart. Dropping it releases the artifact.
#[derive(Debug)]
pub struct RenderedChart {
    kind: ChartKind,
    generation: u64,
    svg: String,
}

impl RenderedChart {
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Which render of the owning board produced this chart.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Write the chart as an SVG file.
    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.svg)?;
        tracing::info!(chart = %self.kind, "chart saved to {}", path.display());
        Ok(())
    }
}

impl Drop for RenderedChart {
    fn drop(&mut self) {
        tracing::trace!(chart = %self.kind, generation = self.generation, "chart released");
    }
}

/// Owns the current chart of each kind.
#[derive(Debug, Default)]
pub struct ChartBoard {
    slots: [Option<RenderedChart>; 3],
    generation: u64,
}

impl ChartBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-render every chart from `snapshot`. An empty snapshot clears the
    /// board instead.
    pub fn render(&mut self, snapshot: &AggregationSnapshot, catalog: &QuestionCatalog) {
        if snapshot.is_empty() {
            self.clear();
            return;
        }
        self.generation += 1;
        for kind in ChartKind::ALL {
            let slot = &mut self.slots[kind.slot()];
            drop(slot.take());
            *slot = Some(RenderedChart {
                kind,
                generation: self.generation,
                svg: render_svg(kind, snapshot, catalog),
            });
        }
    }

    /// Release every chart.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            drop(slot.take());
        }
    }

    pub fn chart(&self, kind: ChartKind) -> Option<&RenderedChart> {
        self.slots[kind.slot()].as_ref()
    }

    /// Write one chart to `path`.
    pub fn save(&self, kind: ChartKind, path: &Path) -> Result<(), ExportError> {
        self.chart(kind)
            .ok_or(ExportError::ChartNotRendered(kind))?
            .save(path)
    }
}

// ---------------------------------------------------------------------------
// SVG rendering
// ---------------------------------------------------------------------------

/// Render one chart as a standalone SVG document.
pub fn render_svg(kind: ChartKind, snapshot: &AggregationSnapshot, catalog: &QuestionCatalog) -> String {
    match kind {
        ChartKind::CorrectRate => {
            let bars: Vec<(String, f64)> = snapshot
                .per_question_correct_rate
                .iter()
                .enumerate()
                .map(|(i, &pct)| (format!("Q{}", i + 1), f64::from(pct)))
                .collect();
            bar_chart(kind.title(), &bars, 100.0, |v| format!("{v:.0}%"))
        }
        ChartKind::GroupAverage => {
            let bars: Vec<(String, f64)> = snapshot
                .per_group_average
                .iter()
                .map(|(group, &avg)| (group.clone(), avg))
                .collect();
            let max = (catalog.len() as f64).max(1.0);
            bar_chart(
                &format!("{} (0-{})", kind.title(), catalog.len()),
                &bars,
                max,
                |v| format!("{v:.1}"),
            )
        }
        ChartKind::ErrorDistribution => pie_chart(kind.title(), &snapshot.error_distribution()),
    }
}

const TITLE_HEIGHT: usize = 30;

fn bar_chart(title: &str, bars: &[(String, f64)], max: f64, value_label: impl Fn(f64) -> String) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 120;

    let total_height = TITLE_HEIGHT + bars.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );
    svg.push_str(&format!(
        "  <text x=\"10\" y=\"20\" font-size=\"16\" font-weight=\"bold\" fill=\"currentColor\">{}</text>\n",
        html_escape(title)
    ));

    for (i, (label, value)) in bars.iter().enumerate() {
        let y = TITLE_HEIGHT + i * (bar_height + padding) + padding;
        let ratio = (value / max).clamp(0.0, 1.0);
        let width = (ratio * max_width as f64) as usize;

        let color = if ratio * 100.0 >= 80.0 {
            "#22c55e"
        } else if ratio * 100.0 >= WEAK_TOPIC_THRESHOLD {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            value_label(*value)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const PALETTE: [&str; 8] = [
    "#3b82f6", "#ef4444", "#22c55e", "#eab308", "#a855f7", "#f97316", "#14b8a6", "#ec4899",
];

fn pie_chart(title: &str, slices: &[ErrorShare]) -> String {
    let radius = 120.0;
    let cx = 150.0;
    let cy = TITLE_HEIGHT as f64 + 20.0 + radius;
    let legend_x = 300;
    let height = TITLE_HEIGHT + 40 + 2 * radius as usize;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        legend_x + 200,
        height
    );
    svg.push_str(&format!(
        "  <text x=\"10\" y=\"20\" font-size=\"16\" font-weight=\"bold\" fill=\"currentColor\">{}</text>\n",
        html_escape(title)
    ));

    if slices.is_empty() {
        svg.push_str(&format!(
            "  <circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"#ccc\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{cx}\" y=\"{cy}\" font-size=\"14\" text-anchor=\"middle\" dominant-baseline=\"middle\">No Incorrect Answers</text>\n"
        ));
        svg.push_str("</svg>\n");
        return svg;
    }

    let total: usize = slices.iter().map(|s| s.count).sum();
    let mut start = -PI / 2.0;

    for (i, slice) in slices.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let sweep = slice.count as f64 / total as f64 * 2.0 * PI;

        if slices.len() == 1 {
            svg.push_str(&format!(
                "  <circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"{color}\"/>\n"
            ));
        } else {
            let end = start + sweep;
            let (x1, y1) = (cx + radius * start.cos(), cy + radius * start.sin());
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = u8::from(sweep > PI);
            svg.push_str(&format!(
                "  <path d=\"M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z\" fill=\"{color}\" stroke=\"#fff\" stroke-width=\"1\"/>\n"
            ));
            start = end;
        }

        let ly = TITLE_HEIGHT + 20 + i * 22;
        svg.push_str(&format!(
            "  <rect x=\"{legend_x}\" y=\"{ly}\" width=\"14\" height=\"14\" fill=\"{color}\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\">Q{}: {} incorrect ({}%)</text>\n",
            legend_x + 20,
            ly + 11,
            slice.question + 1,
            slice.count,
            slice.percent
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
