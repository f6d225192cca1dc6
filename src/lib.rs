pub mod analyzers;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod options;
pub mod output;

pub use analyzers::analyzer::{analyze_bytes, analyze_path};
pub use error::AnalysisError;
pub use options::AnalyzeOptions;
