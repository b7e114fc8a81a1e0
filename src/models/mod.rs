pub mod analysis;
pub mod error;

pub use analysis::{AnalysisResult, ScalarValue};
