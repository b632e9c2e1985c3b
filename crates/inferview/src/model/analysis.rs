//! The analysis result returned by the inference service.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;

/// One processed row: column name to raw cell value, in arrival order.
pub type Record = IndexMap<String, Value>;

/// A validated analysis of one uploaded file.
///
/// Only constructed through [`AnalysisResult::decode`] (or
/// [`AnalysisResult::from_value`]), so every instance satisfies the table
/// invariants: unique columns, one dtype per column and no stray keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Opaque identifier used to fetch the analysis.
    pub id: String,
    /// Name of the uploaded file.
    pub file_name: String,
    /// Upload timestamp as sent by the service.
    pub upload_time: String,
    /// Column names in display order.
    pub columns: Vec<String>,
    /// Raw dtype tag per column.
    pub dtypes: IndexMap<String, String>,
    /// Processed rows.
    #[serde(rename = "data")]
    pub rows: Vec<Record>,
}

impl AnalysisResult {
    /// Decode and validate a response body.
    pub fn decode(body: &[u8]) -> Result<Self, ServiceError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ServiceError::MalformedResponse(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Validate an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ServiceError> {
        if !value.is_object() {
            return Err(ServiceError::MalformedResponse(
                "expected a JSON object".to_string(),
            ));
        }

        let raw: RawAnalysis = serde_json::from_value(value)
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

        let rows = validate_table(&raw.columns, &raw.dtypes, raw.data)
            .map_err(ServiceError::MalformedResponse)?;

        Ok(Self {
            id: raw.id.map(RawId::into_string).unwrap_or_default(),
            file_name: raw.file_name,
            upload_time: raw.upload_time,
            columns: raw.columns,
            dtypes: raw.dtypes,
            rows,
        })
    }

    /// Raw dtype tag for a column.
    pub fn dtype(&self, column: &str) -> Option<&str> {
        self.dtypes.get(column).map(String::as_str)
    }

    /// Parsed upload timestamp. Naive timestamps are read as UTC.
    pub fn uploaded_at(&self) -> Option<DateTime<FixedOffset>> {
        let s = self.upload_time.trim();
        DateTime::parse_from_rfc3339(s).ok().or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.and_utc().fixed_offset())
        })
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Identifier as it may appear on the wire.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    id: Option<RawId>,
    file_name: String,
    upload_time: String,
    columns: Vec<String>,
    dtypes: IndexMap<String, String>,
    data: Vec<Record>,
}

/// Check the table invariants and drop record keys that are not columns.
pub(crate) fn validate_table(
    columns: &[String],
    dtypes: &IndexMap<String, String>,
    rows: Vec<Record>,
) -> Result<Vec<Record>, String> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(format!("duplicate column '{}'", column));
        }
        if !dtypes.contains_key(column) {
            return Err(format!("no dtype for column '{}'", column));
        }
    }

    if let Some(stray) = dtypes.keys().find(|k| !seen.contains(k.as_str())) {
        return Err(format!("dtype given for unknown column '{}'", stray));
    }

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, mut record)| {
            let before = record.len();
            record.retain(|key, _| seen.contains(key.as_str()));
            if record.len() != before {
                log::debug!(
                    "Dropped {} unknown key(s) from row {}",
                    before - record.len(),
                    index
                );
            }
            record
        })
        .collect())
}
