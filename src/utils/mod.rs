//! Generic utility primitives with zero domain knowledge.
//!
//! - `parser` - Literal-safe regex construction and replacement

pub mod parser;
