//! Branch History Table (BHT).
//!
//! Each conditional branch hashes by PC into an entry holding a short local
//! history of its own outcomes and one saturating counter per history
//! pattern. The counter selected by the current history gives the
//! prediction; after resolution the outcome is shifted into the history and
//! the counter selected by the *new* history is trained.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `update()` are O(1)
//! - **Space Complexity:** O(E × 2^H) counters for E entries and H history bits
//! - **Best Case:** Loop branches and branches with short repeating patterns
//! - **Worst Case:** Aliasing hot branches that map to the same entry

use crate::common::SatCounter;

/// One BHT entry: local history plus its pattern counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BhtEntry {
    history: u8,
    counters: Vec<SatCounter>,
}

impl BhtEntry {
    fn new(history_bits: u8, counter_bits: u8) -> Self {
        Self {
            history: 0,
            counters: vec![SatCounter::new(counter_bits); 1 << history_bits],
        }
    }

    /// Recent outcomes of this branch, newest in bit 0.
    pub const fn history(&self) -> u8 {
        self.history
    }

    /// Counter selected by the current history.
    pub fn current(&self) -> SatCounter {
        self.counters[self.history as usize]
    }
}

/// Branch History Table structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bht {
    entries: Vec<BhtEntry>,
    history_mask: u8,
}

impl Bht {
    /// Creates a table of `entries` entries.
    ///
    /// # Arguments
    ///
    /// * `entries` - Number of PC-indexed entries.
    /// * `history_bits` - Local history length per entry (0..=8).
    /// * `counter_bits` - Width of each saturating counter.
    ///
    /// # Panics
    ///
    /// Panics if `entries` is zero, `history_bits` exceeds 8, or
    /// `counter_bits` is not a valid counter width.
    pub fn new(entries: usize, history_bits: u8, counter_bits: u8) -> Self {
        assert!(entries > 0, "BHT must have at least one entry");
        assert!(history_bits <= 8, "BHT history width {history_bits} exceeds 8 bits");
        let history_mask = ((1u16 << history_bits) - 1) as u8;
        Self {
            entries: vec![BhtEntry::new(history_bits, counter_bits); entries],
            history_mask,
        }
    }

    /// Entry index for a branch at `pc`.
    #[inline]
    pub fn index(&self, pc: u64) -> usize {
        ((pc >> 2) % self.entries.len() as u64) as usize
    }

    /// The entry `pc` maps to.
    pub fn entry(&self, pc: u64) -> &BhtEntry {
        &self.entries[self.index(pc)]
    }

    /// Predicts whether the branch at `pc` will be taken.
    #[inline]
    pub fn predict(&self, pc: u64) -> bool {
        self.entry(pc).current().is_set()
    }

    /// Trains the entry for `pc` with the resolved outcome.
    pub fn update(&mut self, pc: u64, taken: bool) {
        let idx = self.index(pc);
        let mask = self.history_mask;
        let entry = &mut self.entries[idx];
        entry.history = ((entry.history << 1) | u8::from(taken)) & mask;
        entry.counters[entry.history as usize].update(taken);
    }
}
