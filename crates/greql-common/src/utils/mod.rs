//! Utility modules shared across GReQL crates.
//!
//! - [`error`] - The crate-wide error type
//! - [`hash`] - Fast, deterministic hash map and set aliases

pub mod error;
pub mod hash;
