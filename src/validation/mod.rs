//! Validation of values decoded from service responses

pub mod data;

pub use data::{DataValidator, ValidationError};
