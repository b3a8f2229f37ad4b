#![warn(missing_docs)]

//! Shared types and utilities used by all of the Cobalt launcher crates

/// Output and messages shown to the user
pub mod output;
/// Common utilities
pub mod util;
