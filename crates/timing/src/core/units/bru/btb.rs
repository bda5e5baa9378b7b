//! Branch Target Buffer (BTB).
//!
//! The BTB is a direct-mapped table holding the last target observed for
//! each control-flow instruction. Entries carry no tag: two sites that map to
//! the same slot share it, which occasionally costs a misprediction but
//! matches the small, tagless buffer of the reference core.

/// Branch Target Buffer structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Btb {
    /// Last observed target per slot (zero until first written).
    table: Vec<u64>,
}

impl Btb {
    /// Creates a Branch Target Buffer with `size` slots.
    ///
    /// # Arguments
    ///
    /// * `size` - The number of entries. Need not be a power of two.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "BTB must have at least one entry");
        Self {
            table: vec![0; size],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the table has no slots. [`Btb::new`] rejects a zero
    /// size, so a constructed BTB reports `false`.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Calculates the slot for a given program counter.
    ///
    /// Drops the two alignment bits and folds the rest onto the table size.
    #[inline]
    pub fn index(&self, pc: u64) -> usize {
        ((pc >> 2) % self.table.len() as u64) as usize
    }

    /// Returns the target last recorded in `pc`'s slot.
    ///
    /// The value may belong to an aliasing instruction; callers compare it
    /// with the resolved target rather than trusting it.
    #[inline]
    pub fn lookup(&self, pc: u64) -> u64 {
        self.table[self.index(pc)]
    }

    /// Records `target` as the prediction for `pc`'s slot.
    #[inline]
    pub fn update(&mut self, pc: u64, target: u64) {
        let idx = self.index(pc);
        self.table[idx] = target;
    }
}
