//! Timing statistics collection and reporting.
//!
//! This module tracks where simulated cycles went. It provides:
//! 1. **Cycle and CPI:** Total cycles, retired instructions, and derived CPI/IPC.
//! 2. **Stalls:** Cycles attributed to each hazard class.
//! 3. **Branch prediction:** Conditional and unconditional lookups and mispredictions.
//! 4. **Instruction cache:** Hit and miss counts.

use std::fmt::Write as _;

use serde::Serialize;

/// The hazard class a stall is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StallCause {
    /// Waiting for a register produced by an earlier instruction.
    Data,
    /// Waiting for the single multiplier or divider to free up.
    Structural,
    /// Load overlapping an in-flight store.
    StoreForward,
    /// Branch, jump or return misprediction.
    Control,
    /// Instruction-cache line fill.
    Fetch,
    /// Stall requested directly by the driving simulator.
    Other,
}

/// Statistics block updated by every component of the timing model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimingStats {
    /// Total simulated cycles (mirrors the pipeline's master counter).
    pub cycles: u64,
    /// Number of instructions retired through the driver.
    pub instructions_retired: u64,

    /// Stall cycles waiting on register results.
    pub stalls_data: u64,
    /// Stall cycles waiting on the multiplier or divider.
    pub stalls_structural: u64,
    /// Stall cycles charged for store-to-load forwarding.
    pub stalls_store_forward: u64,
    /// Stall cycles charged for mispredictions.
    pub stalls_control: u64,
    /// Stall cycles charged for instruction-cache misses.
    pub stalls_fetch: u64,
    /// Stall cycles requested through the plain `stall` entry point.
    pub stalls_other: u64,

    /// Conditional branches looked up in the BHT.
    pub branch_lookups: u64,
    /// Conditional branches whose direction or target was wrong.
    pub branch_mispredictions: u64,
    /// Jumps, calls and returns looked up.
    pub jump_lookups: u64,
    /// Jumps, calls and returns whose target was wrong.
    pub jump_mispredictions: u64,
    /// Returns whose target matched the top of the RAS.
    pub ras_hits: u64,
    /// Returns that found an empty or stale RAS.
    pub ras_misses: u64,

    /// Instruction fetches served by a resident block.
    pub icache_hits: u64,
    /// Instruction fetches that required a line fill.
    pub icache_misses: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"stalls"`, `"branch"`, `"icache"`.
/// Pass an empty slice to `render_sections` to render all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "stalls", "branch", "icache"];

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

impl TimingStats {
    /// Attributes `cycles` of stall to `cause`.
    #[inline]
    pub fn record_stall(&mut self, cause: StallCause, cycles: u64) {
        let slot = match cause {
            StallCause::Data => &mut self.stalls_data,
            StallCause::Structural => &mut self.stalls_structural,
            StallCause::StoreForward => &mut self.stalls_store_forward,
            StallCause::Control => &mut self.stalls_control,
            StallCause::Fetch => &mut self.stalls_fetch,
            StallCause::Other => &mut self.stalls_other,
        };
        *slot += cycles;
    }

    /// Sum of all stall cycles regardless of cause.
    pub const fn total_stalls(&self) -> u64 {
        self.stalls_data
            + self.stalls_structural
            + self.stalls_store_forward
            + self.stalls_control
            + self.stalls_fetch
            + self.stalls_other
    }

    /// Cycles per retired instruction, or `0.0` before anything retired.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Retired instructions per cycle, or `0.0` before any cycle elapsed.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Renders the requested sections as a plain-text report.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]; an
    /// empty slice renders everything.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1) as f64;
        let pct = |n: u64| (n as f64 / cyc) * 100.0;
        let rate = |hits: u64, total: u64| {
            if total == 0 {
                0.0
            } else {
                100.0 * hits as f64 / total as f64
            }
        };

        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "RISC-V CORE TIMING STATISTICS");
        let _ = writeln!(out, "{RULE}");
        if want("summary") {
            let _ = writeln!(out, "sim_cycles               {}", self.cycles);
            let _ = writeln!(out, "sim_insts                {}", self.instructions_retired);
            let _ = writeln!(out, "sim_cpi                  {:.4}", self.cpi());
            let _ = writeln!(out, "sim_ipc                  {:.4}", self.ipc());
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("stalls") {
            let _ = writeln!(out, "STALL BREAKDOWN");
            for (name, n) in [
                ("stalls.data", self.stalls_data),
                ("stalls.structural", self.stalls_structural),
                ("stalls.store_forward", self.stalls_store_forward),
                ("stalls.control", self.stalls_control),
                ("stalls.fetch", self.stalls_fetch),
                ("stalls.other", self.stalls_other),
            ] {
                let _ = writeln!(out, "  {name:<22} {n} ({:.2}%)", pct(n));
            }
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("branch") {
            let correct = self.branch_lookups - self.branch_mispredictions;
            let _ = writeln!(out, "BRANCH PREDICTION");
            let _ = writeln!(out, "  bp.lookups             {}", self.branch_lookups);
            let _ = writeln!(out, "  bp.mispredicts         {}", self.branch_mispredictions);
            let _ = writeln!(
                out,
                "  bp.accuracy            {:.2}%",
                rate(correct, self.branch_lookups)
            );
            let _ = writeln!(out, "  jump.lookups           {}", self.jump_lookups);
            let _ = writeln!(out, "  jump.mispredicts       {}", self.jump_mispredictions);
            let _ = writeln!(out, "  ras.hits               {}", self.ras_hits);
            let _ = writeln!(out, "  ras.misses             {}", self.ras_misses);
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("icache") {
            let total = self.icache_hits + self.icache_misses;
            let _ = writeln!(out, "INSTRUCTION CACHE");
            let _ = writeln!(
                out,
                "  L1-I   accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}%",
                total,
                self.icache_hits,
                rate(self.icache_misses, total)
            );
        }
        let _ = writeln!(out, "{RULE}");
        out
    }

    /// Prints every section to stdout.
    pub fn print(&self) {
        print!("{}", self.render_sections(&[]));
    }
}
