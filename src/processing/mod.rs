//! Response decoding

pub mod parser;

pub use parser::{CoverageResult, ParseError, ResponseParser, VesselFix};
