//! Results table rendering.

use crate::stats::TimingSummary;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use std::time::Duration;

/// Summaries for every configured delay, measured with one strategy.
#[derive(Debug, Clone)]
pub struct StrategyReport {
    pub label: &'static str,
    pub rows: Vec<(Duration, TimingSummary)>,
}

impl StrategyReport {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, target: Duration, summary: TimingSummary) {
        self.rows.push((target, summary));
    }
}

fn numeric(value: f64) -> Cell {
    Cell::new(format!("{:.4}", value)).set_alignment(CellAlignment::Right)
}

/// One row per target delay: average, minimum, maximum and average overshoot in ms.
pub fn render_table(report: &StrategyReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Target (ms)",
            "Average (ms)",
            "Minimum (ms)",
            "Maximum (ms)",
            "Overshoot (ms)",
        ]);

    for (target, summary) in &report.rows {
        table.add_row(vec![
            Cell::new(target.as_millis()).set_alignment(CellAlignment::Right),
            numeric(summary.average_ms()),
            numeric(summary.minimum_ms()),
            numeric(summary.maximum_ms()),
            numeric(summary.overshoot_ms(*target)),
        ]);
    }
    table
}
