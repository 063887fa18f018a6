//! Data models for casebrief.

mod analysis;
mod upload;

pub use analysis::{AnalysisResult, AnalysisSection, SectionKey};
pub use upload::UploadedFile;
