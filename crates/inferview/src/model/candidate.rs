//! A file chosen for upload.

use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::{InferviewError, Result, ValidationError};

/// Media types accepted as comma-separated values.
const CSV_MEDIA_TYPES: &[&str] = &["text/csv", "application/csv", "text/comma-separated-values"];

/// A file the user picked, not yet validated.
///
/// Contents are shared so the candidate can be handed to a request without
/// copying the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    media_type: Option<String>,
    contents: Arc<[u8]>,
}

impl CandidateFile {
    /// Create a candidate from in-memory contents.
    pub fn new(
        name: impl Into<String>,
        media_type: Option<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type,
            contents: Arc::from(contents.into()),
        }
    }

    /// Read a file from disk, guessing its media type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|e| InferviewError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());

        Ok(Self::new(name, media_type, contents))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// SHA-256 of the contents, for logging.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.contents());
        format!("sha256:{:x}", hasher.finalize())
    }

    /// Returns true if the name or declared media type indicates CSV.
    pub fn is_csv(&self) -> bool {
        let by_name = self.name.to_lowercase().ends_with(".csv");
        let by_type = self.media_type.as_deref().is_some_and(|mt| {
            let essence = mt.split(';').next().unwrap_or(mt).trim().to_lowercase();
            CSV_MEDIA_TYPES.contains(&essence.as_str())
        });
        by_name || by_type
    }

    /// Reject anything that is not a CSV file.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.is_csv() {
            Ok(())
        } else {
            Err(ValidationError {
                file_name: self.name.clone(),
                media_type: self.media_type.clone(),
            })
        }
    }
}
