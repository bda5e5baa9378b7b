//! Core timing model.
//!
//! `CoreTiming` is the container the driving simulator talks to. It owns:
//! 1. **Pipeline Model:** Cycle counter, register latencies, unit and store reservations.
//! 2. **Branch Predictor:** BTB, BHT and RAS, charged against the pipeline model.
//! 3. **Instruction Cache:** Timing proxy consulted on every fetch.
//!
//! The predictor and cache never hold on to the pipeline model; each call
//! borrows it for the duration of one retirement.

/// Per-instruction retirement driver.
pub mod execution;

use tracing::debug;

use crate::common::error::ConfigError;
use crate::config::TimingConfig;
use crate::core::pipeline::PipelineTiming;
use crate::core::units::bru::BranchPredictor;
use crate::core::units::cache::{InstructionCache, TimedFetch};
use crate::soc::traits::InstructionFetch;
use crate::stats::TimingStats;

/// Timing state of the whole core.
#[derive(Debug, Clone)]
pub struct CoreTiming {
    /// Cycle counter and hazard tracking.
    pub pipeline: PipelineTiming,
    /// Front-end branch prediction.
    pub predictor: BranchPredictor,
    /// Instruction fetch timing.
    pub icache: InstructionCache,
}

impl CoreTiming {
    /// Builds a cold model from `config`, seeding the random source with `config.seed`.
    ///
    /// # Panics
    ///
    /// Panics if `config` describes a table of zero entries or an invalid
    /// counter width; use [`CoreTiming::try_new`] for unchecked input.
    pub fn new(config: &TimingConfig) -> Self {
        debug!(
            seed = config.seed,
            bht = config.branch.bht_entries,
            btb = config.branch.btb_entries,
            ras = config.branch.ras_entries,
            icache = config.icache.enabled,
            "core timing model created"
        );
        Self {
            pipeline: PipelineTiming::new(&config.pipeline, config.seed),
            predictor: BranchPredictor::new(&config.branch),
            icache: InstructionCache::new(&config.icache),
        }
    }

    /// Validates `config` before building the model.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`TimingConfig::validate`].
    pub fn try_new(config: &TimingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Cycles elapsed since the model was created.
    #[inline(always)]
    pub const fn total_cycles(&self) -> u64 {
        self.pipeline.total_cycles()
    }

    /// Statistics gathered so far.
    pub const fn stats(&self) -> &TimingStats {
        self.pipeline.stats()
    }

    /// Wraps `mem` so that every fetch through it is timed by the i-cache.
    pub fn timed_fetch<'a, M: InstructionFetch + ?Sized>(
        &'a mut self,
        mem: &'a mut M,
    ) -> TimedFetch<'a, M> {
        self.icache.bind(&mut self.pipeline, mem)
    }

    /// Resolves a conditional branch; see [`BranchPredictor::update_branch_prediction`].
    pub fn update_branch_prediction(&mut self, pc: u64, new_pc: u64, taken: bool) -> bool {
        self.predictor
            .update_branch_prediction(&mut self.pipeline, pc, new_pc, taken)
    }

    /// Resolves an unconditional jump; see [`BranchPredictor::do_jump`].
    pub fn do_jump(&mut self, origin: u64, target: u64, fall_through: u64) -> bool {
        self.predictor
            .do_jump(&mut self.pipeline, origin, target, fall_through)
    }

    /// Resolves a call; see [`BranchPredictor::do_call`].
    pub fn do_call(&mut self, origin: u64, target: u64, fall_through: u64) -> bool {
        self.predictor
            .do_call(&mut self.pipeline, origin, target, fall_through)
    }

    /// Resolves a return; see [`BranchPredictor::do_ret`].
    pub fn do_ret(&mut self, origin: u64, target: u64, fall_through: u64) -> bool {
        self.predictor
            .do_ret(&mut self.pipeline, origin, target, fall_through)
    }
}

impl Default for CoreTiming {
    fn default() -> Self {
        Self::new(&TimingConfig::default())
    }
}
