//! Wire model for the inference service and boundary validation.

mod analysis;
mod candidate;
mod process;

pub use analysis::{AnalysisResult, Record};
pub use candidate::CandidateFile;
pub use process::ProcessResponse;
