//! Table output formatting for CLI commands
//!
//! Renders candidate moves and applied-move history with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{MoveKind, NodeKind};
use crate::services::IterationReport;

use crate::cli::commands::neighbors::CandidateRow;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format prioritized candidate moves, best first
    pub fn format_candidates(&self, candidates: &[CandidateRow]) -> String {
        let mut table = self.create_base_table();
        table.set_header(bold_header(&["#", "Move", "Type", "Adds", "Removes", "Value"]));

        for row in candidates {
            let removes = row
                .removed_kind
                .map_or_else(|| "-".to_string(), |kind| kind.to_string());
            table.add_row(vec![
                Cell::new(row.rank),
                Cell::new(row.candidate.to_string()),
                self.kind_cell(row.candidate.kind()),
                self.node_kind_cell(row.added_kind),
                Cell::new(removes),
                Cell::new(row.value),
            ]);
        }

        table.to_string()
    }

    /// Format the iterations that applied a move
    pub fn format_applied_moves(&self, history: &[IterationReport]) -> String {
        let mut table = self.create_base_table();
        table.set_header(bold_header(&["Iteration", "Move", "Type", "Metric"]));

        for report in history {
            let Some(applied) = report.applied else {
                continue;
            };
            table.add_row(vec![
                Cell::new(report.iteration),
                Cell::new(applied.to_string()),
                self.kind_cell(applied.kind()),
                Cell::new(format!("{:.4}", report.metric)),
            ]);
        }

        table.to_string()
    }

    fn kind_cell(&self, kind: MoveKind) -> Cell {
        if !self.use_colors {
            return Cell::new(kind);
        }
        let color = match kind {
            MoveKind::Add => Color::Green,
            MoveKind::Swap => Color::Yellow,
        };
        Cell::new(kind).fg(color)
    }

    fn node_kind_cell(&self, kind: NodeKind) -> Cell {
        if !self.use_colors {
            return Cell::new(kind);
        }
        let color = match kind {
            NodeKind::Notable => Color::Magenta,
            NodeKind::Keystone => Color::Cyan,
            NodeKind::Small => Color::White,
            NodeKind::Travel => Color::DarkGrey,
        };
        Cell::new(kind).fg(color)
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn bold_header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if terminal supports colors
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}
