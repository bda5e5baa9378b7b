//! Core timing model.
//!
//! This module contains the per-core timing components and the driver that
//! ties them together in retirement order.

/// Retirement driver owning the pipeline, predictor and i-cache models.
pub mod cpu;

/// Pipeline timing: cycle counter, register latencies, unit and store reservations.
pub mod pipeline;

/// Functional-unit timing models (branch prediction, instruction cache).
pub mod units;

pub use self::cpu::CoreTiming;
pub use self::pipeline::PipelineTiming;
