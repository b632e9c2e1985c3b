//! Core category definitions.

use serde::{Deserialize, Serialize};

/// Display-oriented category of a column's raw dtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticCategory {
    /// Free text (`object`).
    Text,
    /// Whole numbers (`int8` .. `int64`).
    Integer,
    /// Floating-point numbers (`float32`, `float64`).
    Decimal,
    /// Boolean values (`bool`).
    Boolean,
    /// Timestamps (`datetime64[...]`).
    DateTime,
    /// Categorical values (`category`).
    Category,
    /// Complex numbers (`complex`, `complex128`, ...).
    ComplexNumber,
    /// Tag not in the classification table.
    #[default]
    Unknown,
}

impl SemanticCategory {
    /// Classify a raw dtype tag.
    pub fn of(raw_tag: &str) -> Self {
        super::classify(raw_tag).category
    }

    /// Human-readable name. `Unknown` has none; callers show the raw tag.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            SemanticCategory::Text => Some("Text"),
            SemanticCategory::Integer => Some("Integer"),
            SemanticCategory::Decimal => Some("Decimal"),
            SemanticCategory::Boolean => Some("Boolean"),
            SemanticCategory::DateTime => Some("Date/Time"),
            SemanticCategory::Category => Some("Category"),
            SemanticCategory::ComplexNumber => Some("Complex Number"),
            SemanticCategory::Unknown => None,
        }
    }

    /// Returns true if this category is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SemanticCategory::Integer | SemanticCategory::Decimal | SemanticCategory::ComplexNumber
        )
    }
}

impl std::fmt::Display for SemanticCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name().unwrap_or("Unknown"))
    }
}
