//! Composed branch predictor.
//!
//! Combines the BTB, BHT and RAS into the reference core's front-end
//! prediction and charges a fixed penalty against the pipeline model for
//! every misprediction:
//! 1. **Conditional branches:** BHT direction, then BTB target when predicted taken.
//! 2. **Jumps and calls:** BTB target only; direction is never in doubt.
//! 3. **Returns:** RAS target; the BTB is not consulted.
//!
//! The predictor is trained with the resolved outcome after each
//! control-flow instruction retires, so a prediction and its training always
//! happen in the same call.

use tracing::debug;

use super::bht::Bht;
use super::btb::Btb;
use super::ras::Ras;
use crate::config::BranchConfig;
use crate::core::pipeline::PipelineTiming;
use crate::stats::StallCause;

/// BTB + BHT + RAS predictor with a fixed misprediction penalty.
#[derive(Debug, Clone)]
pub struct BranchPredictor {
    btb: Btb,
    bht: Bht,
    ras: Ras,
    penalty: u64,
}

impl BranchPredictor {
    /// Creates a predictor with cold tables sized by `config`.
    pub fn new(config: &BranchConfig) -> Self {
        Self {
            btb: Btb::new(config.btb_entries),
            bht: Bht::new(
                config.bht_entries,
                config.bht_history_bits,
                config.bht_counter_bits,
            ),
            ras: Ras::new(config.ras_entries),
            penalty: config.mispredict_penalty,
        }
    }

    /// The branch target buffer.
    pub const fn btb(&self) -> &Btb {
        &self.btb
    }

    /// The branch history table.
    pub const fn bht(&self) -> &Bht {
        &self.bht
    }

    /// The return address stack.
    pub const fn ras(&self) -> &Ras {
        &self.ras
    }

    /// Cycles charged per misprediction.
    pub const fn penalty(&self) -> u64 {
        self.penalty
    }

    /// Resolves a conditional branch at `pc` that went to `new_pc`.
    ///
    /// Returns `true` if the branch was mispredicted (and the penalty charged).
    pub fn update_branch_prediction(
        &mut self,
        timing: &mut PipelineTiming,
        pc: u64,
        new_pc: u64,
        taken: bool,
    ) -> bool {
        timing.stats_mut().branch_lookups += 1;

        let predict_taken = self.bht.predict(pc);
        let mispredicted = if predict_taken {
            if !taken {
                true
            } else if self.btb.lookup(pc) == new_pc {
                false
            } else {
                self.btb.update(pc, new_pc);
                true
            }
        } else if taken {
            self.btb.update(pc, new_pc);
            true
        } else {
            false
        };

        self.bht.update(pc, taken);

        if mispredicted {
            timing.stats_mut().branch_mispredictions += 1;
            debug!(
                pc = format_args!("{pc:#x}"),
                target = format_args!("{new_pc:#x}"),
                predict_taken,
                taken,
                "branch mispredicted"
            );
            timing.stall_for(StallCause::Control, self.penalty);
        }
        mispredicted
    }

    /// Resolves an unconditional jump from `origin` to `target`.
    ///
    /// Returns `true` if the BTB held a different target (and the penalty was charged).
    pub fn do_jump(
        &mut self,
        timing: &mut PipelineTiming,
        origin: u64,
        target: u64,
        _fall_through: u64,
    ) -> bool {
        timing.stats_mut().jump_lookups += 1;
        if self.btb.lookup(origin) == target {
            return false;
        }
        self.btb.update(origin, target);
        self.charge_jump(timing, origin, target, "jump target mispredicted");
        true
    }

    /// Resolves a call: a jump whose fall-through address is pushed onto the RAS.
    pub fn do_call(
        &mut self,
        timing: &mut PipelineTiming,
        origin: u64,
        target: u64,
        fall_through: u64,
    ) -> bool {
        let mispredicted = self.do_jump(timing, origin, target, fall_through);
        self.ras.push(fall_through);
        mispredicted
    }

    /// Resolves a return to `target`, predicted from the RAS alone.
    ///
    /// An empty stack or a stale top entry is a misprediction; the target is
    /// recorded in the BTB and the jump penalty is charged.
    pub fn do_ret(
        &mut self,
        timing: &mut PipelineTiming,
        origin: u64,
        target: u64,
        _fall_through: u64,
    ) -> bool {
        timing.stats_mut().jump_lookups += 1;
        if self.ras.pop() == Some(target) {
            timing.stats_mut().ras_hits += 1;
            return false;
        }
        timing.stats_mut().ras_misses += 1;
        self.btb.update(origin, target);
        self.charge_jump(timing, origin, target, "return target mispredicted");
        true
    }

    fn charge_jump(&self, timing: &mut PipelineTiming, origin: u64, target: u64, what: &str) {
        timing.stats_mut().jump_mispredictions += 1;
        debug!(
            pc = format_args!("{origin:#x}"),
            target = format_args!("{target:#x}"),
            "{what}"
        );
        timing.stall_for(StallCause::Control, self.penalty);
    }
}
