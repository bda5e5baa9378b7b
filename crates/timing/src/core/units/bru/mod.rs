//! Branch prediction unit (BRU).
//!
//! The reference core predicts control flow with three small structures:
//! a direct-mapped branch target buffer (BTB), a per-PC branch history table
//! of saturating counters (BHT), and a shallow return address stack (RAS).
//! [`BranchPredictor`] composes them and charges misprediction penalties.

pub use self::branch_predictor::BranchPredictor;

/// Branch History Table of per-PC local history and saturating counters.
pub mod bht;

/// Composed predictor charging mispredictions against the pipeline model.
pub mod branch_predictor;

/// Branch Target Buffer for storing last-seen targets.
pub mod btb;

/// Return Address Stack for predicting return addresses.
pub mod ras;
