//! Pipeline timing model.
//!
//! `PipelineTiming` is the single source of simulated time. The driving
//! simulator reports each retiring instruction's effects in order and the
//! model charges the stalls they imply:
//! 1. **Data Hazards:** Reading a register whose producer has not finished.
//! 2. **Structural Hazards:** Issuing to the multiplier or divider while it is busy.
//! 3. **Store Forwarding:** Loading bytes an in-flight store is still writing.
//!
//! The branch predictor and instruction cache borrow the model mutably to
//! charge their own penalties through [`PipelineTiming::stall_for`].
//!
//! Contract violations (two pending results for one register, zero-cycle
//! advances) indicate a bug in the driver and panic at the offending call.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::latency::RegisterLatencyTable;
use super::reservation::{OpReservation, StoreReservationSet};
use crate::common::AddrRange;
use crate::common::constants::WORD_BYTES;
use crate::config::PipelineConfig;
use crate::stats::{StallCause, TimingStats};

/// Cycle counter plus the hazard state of an in-order single-issue core.
#[derive(Debug, Clone)]
pub struct PipelineTiming {
    regs: RegisterLatencyTable,
    mult: OpReservation,
    div: OpReservation,
    stores: StoreReservationSet,
    total_cycles: u64,
    config: PipelineConfig,
    /// Shared by the divider and the i-cache miss model; seeded for reproducible runs.
    rng: StdRng,
    stats: TimingStats,
}

impl PipelineTiming {
    /// Creates a model at cycle zero whose random source is seeded with `seed`.
    pub fn new(config: &PipelineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Creates a model at cycle zero drawing randomness from `rng`.
    pub fn with_rng(config: &PipelineConfig, rng: StdRng) -> Self {
        Self {
            regs: RegisterLatencyTable::new(),
            mult: OpReservation::new(),
            div: OpReservation::new(),
            stores: StoreReservationSet::new(),
            total_cycles: 0,
            config: config.clone(),
            rng,
            stats: TimingStats::default(),
        }
    }

    /// Cycles elapsed since the model was created.
    #[inline(always)]
    pub const fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Statistics gathered so far.
    #[inline(always)]
    pub const fn stats(&self) -> &TimingStats {
        &self.stats
    }

    /// Mutable statistics, for the components that charge through this model.
    #[inline(always)]
    pub fn stats_mut(&mut self) -> &mut TimingStats {
        &mut self.stats
    }

    /// Latency parameters this model was built with.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Remaining cycles until `reg` is readable, if it is pending.
    pub fn pending_latency(&self, reg: usize) -> Option<u64> {
        self.regs.pending(reg)
    }

    /// Remaining multiplier occupancy, if busy.
    pub const fn mult_busy(&self) -> Option<u64> {
        self.mult.remaining()
    }

    /// Remaining divider occupancy, if busy.
    pub const fn div_busy(&self) -> Option<u64> {
        self.div.remaining()
    }

    /// Moves simulated time forward by `n` cycles.
    ///
    /// Every pending register, unit reservation and store reservation counts
    /// down by `n`; those reaching zero are released.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn advance(&mut self, n: u64) {
        assert!(n > 0, "advance requires a non-zero cycle count");
        self.regs.advance(n);
        self.mult.advance(n);
        self.div.advance(n);
        self.stores.advance(n);
        self.total_cycles += n;
        self.stats.cycles = self.total_cycles;
    }

    /// Blocks for `n` cycles. Identical to [`advance`](Self::advance) but
    /// marks a wait rather than forward progress.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn stall(&mut self, n: u64) {
        assert!(n > 0, "stall requires a non-zero cycle count");
        self.stall_for(StallCause::Other, n);
    }

    /// Blocks for `n` cycles and charges them to `cause`. Zero is a no-op.
    pub fn stall_for(&mut self, cause: StallCause, n: u64) {
        if n == 0 {
            return;
        }
        trace!(cycle = self.total_cycles, cycles = n, ?cause, "stall");
        self.stats.record_stall(cause, n);
        self.advance(n);
    }

    /// Charges the wait for `reg` if an earlier instruction is still producing it.
    pub fn access_register(&mut self, reg: usize) {
        if let Some(left) = self.regs.pending(reg) {
            self.stall_for(StallCause::Data, left);
        }
    }

    /// Marks `reg` unreadable for the next `cycles` cycles.
    ///
    /// # Panics
    ///
    /// Panics if `reg` already has a pending result or `cycles` is zero.
    pub fn add_result_latency(&mut self, reg: usize, cycles: u64) {
        self.regs.insert(reg, cycles);
    }

    /// Reserves the multiplier for `cycles`, first waiting out any current user.
    pub fn reserve_mult(&mut self, cycles: u64) {
        if let Some(left) = self.mult.remaining() {
            self.stall_for(StallCause::Structural, left);
        }
        self.mult.acquire(cycles);
    }

    /// Reserves the divider for `cycles`, first waiting out any current user.
    pub fn reserve_div(&mut self, cycles: u64) {
        if let Some(left) = self.div.remaining() {
            self.stall_for(StallCause::Structural, left);
        }
        self.div.acquire(cycles);
    }

    /// Issues a multiply writing `dest`. The product is readable one cycle
    /// after the multiplier frees up.
    pub fn do_mult(&mut self, dest: usize, a: u64, b: u64) {
        let cost = self.mult_cost(a, b);
        self.reserve_mult(cost);
        self.add_result_latency(dest, cost + 1);
    }

    /// Issues a divide writing `dest`. The divider is not constant-time, so
    /// each call draws its occupancy from the configured window.
    pub fn do_div(&mut self, dest: usize, a: u64, b: u64) {
        let cost = self.div_cost(a, b);
        self.reserve_div(cost);
        self.add_result_latency(dest, cost + 1);
    }

    /// Issues a CSR read into `dest`. CSR access has a dedicated fixed latency.
    pub fn do_csr(&mut self, dest: usize) {
        self.add_result_latency(dest, self.config.csr_latency);
    }

    /// Records a store to `range` that completes `cycles` cycles from now.
    /// It remains visible to overlapping loads for `cycles + 1` cycles.
    pub fn reserve_store(&mut self, range: AddrRange, cycles: u64) {
        self.stores.reserve(range, cycles + 1);
    }

    /// Returns `true` if any in-flight store overlaps `range`.
    pub fn has_store_reservation(&self, range: &AddrRange) -> bool {
        self.stores.overlaps(range)
    }

    /// Issues a load of `range` into `dest`.
    ///
    /// A load overlapping an in-flight store stalls for exactly
    /// `store_forward_penalty` cycles whatever its width. A forwarded load
    /// narrower than a word also adds `subword_forward_extra` to the result
    /// latency of `dest`; that extra is not part of the stall.
    pub fn do_load(&mut self, range: AddrRange, dest: usize, base_latency: u64) {
        let mut extra = 0;
        if self.stores.overlaps(&range) {
            self.stall_for(StallCause::StoreForward, self.config.store_forward_penalty);
            if range.size() < WORD_BYTES {
                extra = self.config.subword_forward_extra;
            }
        }
        let latency = base_latency + extra;
        if latency > 0 {
            self.add_result_latency(dest, latency);
        }
    }

    /// Draws a value from `[min, max]` using the model's random source.
    pub(crate) fn random_cycles(&mut self, min: u64, max: u64) -> u64 {
        self.rng.gen_range(min..=max)
    }

    /// The multiplier is fully pipelined internally; operand values do not
    /// change its occupancy.
    const fn mult_cost(&self, _a: u64, _b: u64) -> u64 {
        self.config.mult_latency
    }

    fn div_cost(&mut self, _a: u64, _b: u64) -> u64 {
        self.random_cycles(self.config.div_latency_min, self.config.div_latency_max)
    }
}
