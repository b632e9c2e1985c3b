//! Render command - display a saved analysis response offline.

use std::path::PathBuf;

use inferview::{AnalysisResult, InferviewError, ProcessResponse};

use crate::cli::DisplayArgs;

use super::output::render_result;

pub fn run(file: PathBuf, display: &DisplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let body = std::fs::read(&file).map_err(|source| InferviewError::Io {
        path: file.clone(),
        source,
    })?;

    let fallback_name = file
        .file_stem()
        .map(|s| format!("{}.csv", s.to_string_lossy()))
        .unwrap_or_default();

    let result = decode_saved(&body, &fallback_name).map_err(|e| {
        format!("{} is not a saved analysis: {}", file.display(), e)
    })?;
    render_result(&result, display)
}

/// Decode either a fetched analysis or an upload response carrying a table.
fn decode_saved(body: &[u8], fallback_name: &str) -> Result<AnalysisResult, String> {
    let analysis_err = match AnalysisResult::decode(body) {
        Ok(result) => return Ok(result),
        Err(e) => e,
    };
    log::debug!("Not an analysis ({}); trying upload response", analysis_err);

    match ProcessResponse::decode(body) {
        Ok(response) => response
            .into_analysis(fallback_name)
            .ok_or_else(|| "upload response carries no table".to_string()),
        Err(_) => Err(analysis_err.to_string()),
    }
}
