// Report document - the rows and column sizes of the results sheet

use crate::state::{RunState, TestStatus};
use crate::time::format_timestamp;
use chrono::NaiveDateTime;

/// Widest column the XLSX format accepts, in characters
pub const MAX_COLUMN_WIDTH: f64 = 255.0;

/// Longest text a single XLSX cell holds
pub const MAX_CELL_CHARS: usize = 32_767;

/// First row of the detail table; row 10 stays empty
pub const DETAIL_FIRST_ROW: u32 = 11;

pub const COLUMN_COUNT: usize = 5;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Count(usize),
    /// Elapsed seconds, shown with three decimals
    Seconds(f64),
}

impl CellValue {
    /// How the value reads once rendered
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Count(n) => n.to_string(),
            CellValue::Seconds(secs) => format!("{:.3}", secs),
        }
    }
}

/// Label/value pair of the summary block
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: CellValue,
}

/// One line of the detail table
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub timestamp: String,
    pub test: String,
    pub elapsed: f64,
    pub status: TestStatus,
    pub message: String,
}

impl DetailRow {
    pub fn cells(&self) -> [CellValue; COLUMN_COUNT] {
        [
            CellValue::Text(self.timestamp.clone()),
            CellValue::Text(self.test.clone()),
            CellValue::Seconds(self.elapsed),
            CellValue::Text(self.status.to_string()),
            CellValue::Text(self.message.clone()),
        ]
    }
}

/// Rendered content of the results sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    /// Rows 0..=9 in order; `None` is a blank row
    pub summary: Vec<Option<SummaryRow>>,
    pub details: Vec<DetailRow>,
}

/// Cut text down to what one cell holds
pub fn fit_cell(text: &str) -> String {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

fn window_cell(moment: Option<NaiveDateTime>) -> CellValue {
    CellValue::Text(moment.as_ref().map(format_timestamp).unwrap_or_default())
}

impl ReportDocument {
    /// Lay out the summary block and the detail table.
    ///
    /// Pure: the same state always produces the same rows.
    pub fn build(suite_name: &str, state: &RunState) -> Self {
        let stats = state.stats();
        let row = |label, value| Some(SummaryRow { label, value });

        let summary = vec![
            row("Suite", CellValue::Text(fit_cell(suite_name))),
            None,
            row("Start datetime", window_cell(state.window.start)),
            row("End datetime", window_cell(state.window.end)),
            None,
            row("Total", CellValue::Count(stats.total())),
            row("Errors", CellValue::Count(stats.errors())),
            row("Failures", CellValue::Count(stats.failures())),
            row("Passes", CellValue::Count(stats.passes())),
            row("Skipped", CellValue::Count(stats.skipped())),
        ];

        let details = state
            .records()
            .iter()
            .map(|record| DetailRow {
                timestamp: format_timestamp(&record.timestamp),
                test: fit_cell(&record.test),
                elapsed: record.elapsed,
                status: record.status,
                message: fit_cell(&record.message),
            })
            .collect();

        Self { summary, details }
    }

    /// Width of each column, in characters, fitted to its longest value.
    ///
    /// Columns holding nothing, or only empty text, get `None` and keep the
    /// sheet default.
    pub fn column_widths(&self) -> [Option<f64>; COLUMN_COUNT] {
        let mut longest = [None::<usize>; COLUMN_COUNT];
        let mut fit = |col: usize, text: &str| {
            let len = text.chars().count();
            longest[col] = Some(longest[col].map_or(len, |cur| cur.max(len)));
        };

        for row in self.summary.iter().flatten() {
            fit(0, row.label);
            fit(1, &row.value.render());
        }
        for row in &self.details {
            for (col, cell) in row.cells().iter().enumerate() {
                fit(col, &cell.render());
            }
        }

        longest.map(|len| len.filter(|&n| n > 0).map(column_width))
    }
}

/// Convert a character count into a column width, clamped to the format limit
pub fn column_width(chars: usize) -> f64 {
    (chars as f64).min(MAX_COLUMN_WIDTH)
}
