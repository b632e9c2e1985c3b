//! Mapping from raw dtype tags to semantic categories.
//!
//! The inference service reports pandas dtype names. Parametric suffixes such
//! as `[ns]` or `[ns, UTC]` are stripped before the lookup, so
//! `datetime64[ns, US/Eastern]` and `datetime64[ns]` classify the same way.

use serde::{Deserialize, Serialize};

use super::SemanticCategory;

/// Category plus the label to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeClassification {
    pub category: SemanticCategory,
    /// Category display name, or the raw tag for `Unknown`.
    pub label: String,
}

/// Strip any `[...]` suffix and lower-case the remainder.
pub fn normalize_tag(raw_tag: &str) -> String {
    let base = raw_tag.split('[').next().unwrap_or(raw_tag);
    base.to_lowercase()
}

/// Classify a raw dtype tag. Never fails; unrecognised tags are `Unknown`.
pub fn classify(raw_tag: &str) -> TypeClassification {
    let category = match normalize_tag(raw_tag).as_str() {
        "object" => SemanticCategory::Text,
        "int8" | "int16" | "int32" | "int64" => SemanticCategory::Integer,
        "float32" | "float64" => SemanticCategory::Decimal,
        "bool" => SemanticCategory::Boolean,
        "datetime64" => SemanticCategory::DateTime,
        "category" => SemanticCategory::Category,
        "complex" | "complex64" | "complex128" | "complex256" => SemanticCategory::ComplexNumber,
        _ => SemanticCategory::Unknown,
    };

    let label = match category.display_name() {
        Some(name) => name.to_string(),
        None => raw_tag.to_string(),
    };

    TypeClassification { category, label }
}
