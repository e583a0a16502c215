// Public modules
pub mod canonical;
pub mod config;
pub mod driver;
pub mod error;
pub mod resolver;
pub mod rewriter;
pub mod source_tree;
pub mod walker;

// Re-export common types for convenience
pub use config::CasefixConfig;
pub use driver::{run, run_with, RunEvent, RunOptions, RunSummary};
pub use error::{Error, ErrorCode, Result};
pub use rewriter::{ImportFix, SkippedFile};
pub use source_tree::SourceTree;
