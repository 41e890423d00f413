// Public modules
pub mod defaults;
pub mod error;
pub mod local_files;
pub mod package;
pub mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
