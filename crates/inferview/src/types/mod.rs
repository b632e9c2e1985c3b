//! Semantic categories for raw dtype tags reported by the inference service.

mod category;
mod classifier;

pub use category::SemanticCategory;
pub use classifier::{TypeClassification, classify, normalize_tag};
