//! Core types and constants for the coverage tracker

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
