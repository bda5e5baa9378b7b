//! Retirement trace input.
//!
//! The timing model is driven by the effects of each retiring instruction.
//! This module defines that record and reads it from JSON-lines traces
//! produced by a functional simulator.

/// Retired-instruction records and the JSON-lines trace reader.
pub mod trace;

pub use self::trace::{Effect, Retired, TraceError, TraceReader, read_trace};
