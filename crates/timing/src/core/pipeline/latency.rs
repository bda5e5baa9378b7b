//! Register result latency table.
//!
//! Maps each architectural register to the number of cycles until its
//! pending value becomes readable, or `None` if the register file already
//! holds it. An instruction that reads a pending register stalls for the
//! remaining cycles.

use crate::common::constants::NUM_REGS;

/// Pending result latencies, one slot per integer register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterLatencyTable {
    /// x0 slot is never populated (hardwired zero).
    slots: [Option<u64>; NUM_REGS],
}

impl RegisterLatencyTable {
    /// Create a table with no pending results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining cycles for `reg`, or `None` if its value is available.
    #[inline]
    pub fn pending(&self, reg: usize) -> Option<u64> {
        self.slots[Self::check(reg)]
    }

    /// Number of registers with a pending result.
    pub fn live(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Record that `reg` becomes readable in `cycles` cycles.
    /// No-op for x0.
    ///
    /// # Panics
    ///
    /// Panics if `cycles` is zero or `reg` already has a pending result: the
    /// driving simulator must never leave two results in flight for one register.
    pub fn insert(&mut self, reg: usize, cycles: u64) {
        assert!(cycles > 0, "result latency for x{reg} must be non-zero");
        let slot = &mut self.slots[Self::check(reg)];
        if reg == 0 {
            return;
        }
        assert!(
            slot.is_none(),
            "register latency invariant violated: x{reg} already pending for {} cycles",
            slot.unwrap_or_default()
        );
        *slot = Some(cycles);
    }

    /// Count every pending result down by `n`, retiring those that reach zero.
    pub fn advance(&mut self, n: u64) {
        for slot in &mut self.slots {
            if let Some(left) = *slot {
                *slot = left.checked_sub(n).filter(|&c| c > 0);
            }
        }
    }

    #[inline(always)]
    fn check(reg: usize) -> usize {
        assert!(reg < NUM_REGS, "register index x{reg} out of range");
        reg
    }
}
