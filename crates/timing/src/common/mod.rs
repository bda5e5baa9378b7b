//! Common types shared by every timing component.
//!
//! This module provides the small building blocks the pipeline, predictor and
//! cache models are written in terms of:
//! 1. **Address Ranges:** Half-open byte ranges used for store/load overlap checks.
//! 2. **Saturating Counters:** Fixed-width counters used by the branch history table.
//! 3. **Error Handling:** Configuration errors reported while building a model.
//! 4. **Constants:** Register file size and word width.

/// Half-open address range type.
pub mod addr;

/// Common constants used throughout the model.
pub mod constants;

/// Fixed-width saturating counter.
pub mod counter;

/// Error types for configuration validation.
pub mod error;

pub use addr::AddrRange;
pub use counter::SatCounter;
pub use error::ConfigError;
