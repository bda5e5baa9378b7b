//! Functional-unit timing models.
//!
//! These units never own simulated time. Each borrows the
//! [`PipelineTiming`](crate::core::pipeline::PipelineTiming) model for the
//! duration of a call and charges its penalties there.

/// Branch resolution unit: BTB, BHT, RAS and the composed predictor.
pub mod bru;

/// Instruction cache timing proxy.
pub mod cache;
