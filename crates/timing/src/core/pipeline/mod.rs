//! Pipeline timing model.
//!
//! The in-order core is modelled as a single cycle counter plus the state
//! needed to decide how long each retiring instruction must wait:
//! 1. **Register Latencies:** Destination registers whose values are not yet available.
//! 2. **Unit Reservations:** The single multiplier and divider, each busy for N cycles.
//! 3. **Store Reservations:** In-flight stores a later load may have to forward from.
//!
//! [`PipelineTiming`] composes these and owns the master `total_cycles` counter.

/// Per-register result latency tracking.
pub mod latency;

/// Functional-unit and store reservations.
pub mod reservation;

/// The composed pipeline timing model.
pub mod timing;

pub use self::latency::RegisterLatencyTable;
pub use self::reservation::{OpReservation, StoreReservation, StoreReservationSet};
pub use self::timing::PipelineTiming;
