//! Response to an upload.

use chrono::Utc;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ServiceError;

use super::analysis::{AnalysisResult, RawId, Record, validate_table};

/// Body of a successful upload.
///
/// Always carries the analysis id. Some deployments also return the
/// processed table inline, which can be shown without a follow-up fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessResponse {
    pub id: String,
    pub columns: Option<Vec<String>>,
    pub dtypes: Option<IndexMap<String, String>>,
    pub rows: Option<Vec<Record>>,
}

#[derive(Debug, Deserialize)]
struct RawProcessResponse {
    id: RawId,
    #[serde(default)]
    columns: Option<Vec<String>>,
    #[serde(default)]
    dtypes: Option<IndexMap<String, String>>,
    #[serde(default)]
    data: Option<Vec<Record>>,
}

impl ProcessResponse {
    /// A response carrying only an id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            columns: None,
            dtypes: None,
            rows: None,
        }
    }

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

        let raw: RawProcessResponse = serde_json::from_value(value)
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

        let id = raw.id.into_string();
        if id.trim().is_empty() {
            return Err(ServiceError::MalformedResponse("empty id".to_string()));
        }

        // Partial tables are kept as-is; only a complete one is checked.
        let rows = match (&raw.columns, &raw.dtypes, raw.data) {
            (Some(columns), Some(dtypes), Some(data)) => Some(
                validate_table(columns, dtypes, data).map_err(ServiceError::MalformedResponse)?,
            ),
            (_, _, data) => data,
        };

        Ok(Self {
            id,
            columns: raw.columns,
            dtypes: raw.dtypes,
            rows,
        })
    }

    /// Returns true if the response carries a complete table.
    pub fn has_table(&self) -> bool {
        self.columns.is_some() && self.dtypes.is_some() && self.rows.is_some()
    }

    /// Build an analysis from the inline table, if there is one.
    ///
    /// The upload response has no file name or timestamp; the caller's file
    /// name and the current time are used.
    pub fn into_analysis(self, file_name: impl Into<String>) -> Option<AnalysisResult> {
        match (self.columns, self.dtypes, self.rows) {
            (Some(columns), Some(dtypes), Some(rows)) => Some(AnalysisResult {
                id: self.id,
                file_name: file_name.into(),
                upload_time: Utc::now().to_rfc3339(),
                columns,
                dtypes,
                rows,
            }),
            _ => None,
        }
    }
}
