//! Display model assembled from an analysis result.
//!
//! Everything here is pure: no I/O, no failure modes. Column order always
//! follows `AnalysisResult::columns`, whatever order the dtypes or records
//! arrived in.

use indexmap::IndexMap;
use serde::Serialize;

use crate::format::format_value;
use crate::model::{AnalysisResult, Record};
use crate::types::{SemanticCategory, classify};

/// Rows shown in a preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Output format for the upload time.
const UPLOAD_TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// One column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub column_name: String,
    pub category: SemanticCategory,
    /// Category display name, or the raw tag for unknown types.
    pub label: String,
    /// The dtype tag as reported.
    pub raw_type: String,
}

/// One formatted row: column name to display string, in column order.
pub type RowView = IndexMap<String, String>;

/// Columns and formatted rows ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
}

impl ResultView {
    /// Column names in display order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column_name.as_str()).collect()
    }

    /// Cells of a row in column order.
    pub fn cells<'a>(&'a self, row: &'a RowView) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|c| row.get(&c.column_name).map(String::as_str).unwrap_or(""))
            .collect()
    }
}

/// Build the display model for every row.
pub fn present(result: &AnalysisResult) -> ResultView {
    build(result, &result.rows)
}

/// Build the display model for the first `limit` rows.
pub fn present_preview(result: &AnalysisResult, limit: usize) -> ResultView {
    let end = limit.min(result.rows.len());
    build(result, &result.rows[..end])
}

fn build(result: &AnalysisResult, rows: &[Record]) -> ResultView {
    let columns = result
        .columns
        .iter()
        .map(|name| {
            let raw_type = result.dtype(name).unwrap_or_default();
            let classification = classify(raw_type);
            ColumnView {
                column_name: name.clone(),
                category: classification.category,
                label: classification.label,
                raw_type: raw_type.to_string(),
            }
        })
        .collect();

    let rows = rows
        .iter()
        .map(|record| {
            result
                .columns
                .iter()
                .map(|name| {
                    let raw_type = result.dtype(name).unwrap_or_default();
                    (name.clone(), format_value(record.get(name), raw_type))
                })
                .collect()
        })
        .collect();

    ResultView { columns, rows }
}

/// Summary line of a results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultHeader {
    pub id: String,
    pub file_name: String,
    /// Upload time as `MM/DD/YYYY HH:MM:SS`, or the raw value if unparseable.
    pub upload_time: String,
    pub column_count: usize,
    pub row_count: usize,
}

impl ResultHeader {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let upload_time = match result.uploaded_at() {
            Some(ts) => ts.format(UPLOAD_TIME_FORMAT).to_string(),
            None => result.upload_time.clone(),
        };

        Self {
            id: result.id.clone(),
            file_name: result.file_name.clone(),
            upload_time,
            column_count: result.column_count(),
            row_count: result.row_count(),
        }
    }
}
