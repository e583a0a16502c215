//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling
//! - `paths` - Lexical path normalization and relative path computation

pub mod io;
pub mod paths;
