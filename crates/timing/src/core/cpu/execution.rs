//! Retirement driver.
//!
//! Charges one retired instruction in the order a single-issue pipeline
//! would see its costs: fetch, operand reads, execution unit, memory,
//! control flow, then the one-cycle issue slot every instruction occupies.

use tracing::trace;

use super::CoreTiming;
use crate::common::AddrRange;
use crate::sim::trace::{Effect, Retired};
use crate::soc::traits::InstructionFetch;

impl CoreTiming {
    /// Charges `insn` against the model and returns the instruction word
    /// fetched for it from `mem`.
    ///
    /// A destination register that still has a result in flight is waited
    /// out before the new write issues, so back-to-back writers of one
    /// register serialize instead of overlapping.
    ///
    /// # Panics
    ///
    /// Panics if `insn` names a register above `x31` or an access range
    /// that wraps the address space.
    pub fn retire<M: InstructionFetch + ?Sized>(&mut self, insn: &Retired, mem: &mut M) -> u32 {
        let start = self.pipeline.total_cycles();
        let word = self.icache.fetch(&mut self.pipeline, mem, insn.pc);

        for &reg in &insn.reads {
            self.pipeline.access_register(reg);
        }
        if let Some(rd) = insn.dest() {
            self.pipeline.access_register(rd);
        }

        let pc = insn.pc;
        let fall_through = insn.fall_through();
        match insn.effect {
            Effect::None => {}
            Effect::Mul { rd, a, b } => self.pipeline.do_mult(rd, a, b),
            Effect::Div { rd, a, b } => self.pipeline.do_div(rd, a, b),
            Effect::Csr { rd } => self.pipeline.do_csr(rd),
            Effect::Load {
                rd,
                addr,
                size,
                latency,
            } => self
                .pipeline
                .do_load(AddrRange::with_len(addr, size), rd, latency),
            Effect::Store { addr, size, cycles } => self
                .pipeline
                .reserve_store(AddrRange::with_len(addr, size), cycles),
            Effect::Branch { target, taken } => {
                let new_pc = if taken { target } else { fall_through };
                let _ = self.update_branch_prediction(pc, new_pc, taken);
            }
            Effect::Jump { target } => {
                let _ = self.do_jump(pc, target, fall_through);
            }
            Effect::Call { target } => {
                let _ = self.do_call(pc, target, fall_through);
            }
            Effect::Ret { target } => {
                let _ = self.do_ret(pc, target, fall_through);
            }
        }

        self.pipeline.advance(1);
        self.pipeline.stats_mut().instructions_retired += 1;
        trace!(
            pc = format_args!("{pc:#x}"),
            cycles = self.pipeline.total_cycles() - start,
            "retired"
        );
        word
    }

    /// Retires every record in `trace` in order, fetching from `mem`.
    pub fn run<'t, M, I>(&mut self, trace: I, mem: &mut M)
    where
        M: InstructionFetch + ?Sized,
        I: IntoIterator<Item = &'t Retired>,
    {
        for insn in trace {
            let _ = self.retire(insn, mem);
        }
    }
}
