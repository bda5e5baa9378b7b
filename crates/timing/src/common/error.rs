//! Configuration error definitions.
//!
//! The timing model itself has no recoverable errors: a broken call sequence
//! from the driving simulator is a bug and panics at the offending call. The
//! only fallible step is turning a user-supplied [`TimingConfig`] into a model,
//! which is reported through [`ConfigError`].
//!
//! [`TimingConfig`]: crate::config::TimingConfig

use thiserror::Error;

/// Reasons a timing configuration is rejected by `TimingConfig::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A table or structure was configured with zero entries.
    #[error("{field} must be non-zero")]
    ZeroSized {
        /// Dotted path of the offending field, e.g. `branch.btb_entries`.
        field: &'static str,
    },

    /// A size that the address decomposition needs as a power of two is not one.
    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// A bit width lies outside the supported range.
    #[error("{field} must be within {min}..={max} bits, got {value}")]
    BitWidth {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected width.
        value: u8,
        /// Smallest accepted width.
        min: u8,
        /// Largest accepted width.
        max: u8,
    },

    /// A `[min, max]` cycle window has `min > max`.
    #[error("{field} window is inverted: min {min} > max {max}")]
    InvertedWindow {
        /// Dotted path of the offending window.
        field: &'static str,
        /// Configured lower bound.
        min: u64,
        /// Configured upper bound.
        max: u64,
    },

    /// The i-cache geometry leaves less than one byte per line.
    #[error("icache capacity {capacity} cannot be split into {buckets} two-way buckets")]
    CacheGeometry {
        /// Configured capacity in bytes.
        capacity: u64,
        /// Configured number of buckets.
        buckets: usize,
    },
}
