//! Cycle-accurate timing side-model for an in-order RISC-V microcontroller core.
//!
//! A functional instruction-set simulator reports the effects of each retired
//! instruction; this crate turns them into simulated clock cycles:
//! 1. **Pipeline:** Register result latencies, multiplier/divider occupancy, store forwarding.
//! 2. **Branch Prediction:** BTB, BHT and RAS with a fixed misprediction penalty.
//! 3. **Instruction Cache:** Two-way timing proxy in front of the fetch path.
//! 4. **Simulation:** JSON-lines retirement traces, configuration and statistics.
//!
//! # Examples
//!
//! ```
//! use rvtiming_core::sim::trace::{Effect, Retired};
//! use rvtiming_core::soc::FlatMemory;
//! use rvtiming_core::{CoreTiming, TimingConfig};
//!
//! let mut config = TimingConfig::default();
//! config.icache.enabled = false;
//! let mut core = CoreTiming::new(&config);
//! let mut mem = FlatMemory::zeroed(0x0, 0x100);
//!
//! let mul = Retired { effect: Effect::Mul { rd: 3, a: 6, b: 7 }, ..Retired::plain(0x0) };
//! let use_r3 = Retired { reads: vec![3], ..Retired::plain(0x4) };
//! let _ = core.retire(&mul, &mut mem);
//! let _ = core.retire(&use_r3, &mut mem);
//!
//! assert_eq!(core.stats().stalls_data, 6);
//! assert_eq!(core.total_cycles(), 8);
//! ```

/// Shared types (address ranges, saturating counters, errors, constants).
pub mod common;
/// Model configuration (defaults, per-component sections, validation).
pub mod config;
/// Core timing (pipeline model, branch predictor, instruction cache, driver).
pub mod core;
/// Retirement trace records and reader.
pub mod sim;
/// Memory-side interfaces (instruction fetch trait, flat backing store).
pub mod soc;
/// Timing statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `TimingConfig::default()` or deserialize from JSON.
pub use crate::config::TimingConfig;
/// Whole-core model; owns the pipeline, predictor and instruction cache.
pub use crate::core::CoreTiming;
/// Cycle counter and hazard tracking.
pub use crate::core::PipelineTiming;
/// Fetch capability consumed by the instruction cache.
pub use crate::soc::InstructionFetch;
/// Counters reported at the end of a run.
pub use crate::stats::TimingStats;
