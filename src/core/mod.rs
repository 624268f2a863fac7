//! Core types and constants for the location filter

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
