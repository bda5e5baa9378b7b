//! Half-open address ranges.
//!
//! Loads and stores are tracked by the byte range they touch rather than by a
//! single address, so that a byte store followed by a word load of the
//! enclosing word is still seen as a forwarding hazard.

use std::fmt;

/// A byte range `[start, end)` in the simulated address space.
///
/// The constructor enforces `end >= start`; an empty range (`start == end`)
/// is allowed but never overlaps anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddrRange {
    start: u64,
    end: u64,
}

impl AddrRange {
    /// Creates a range from `start` (inclusive) to `end` (exclusive).
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    #[inline]
    pub fn new(start: u64, end: u64) -> Self {
        assert!(
            end >= start,
            "address range invariant violated: end {end:#x} < start {start:#x}"
        );
        Self { start, end }
    }

    /// Creates a range covering `len` bytes starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start + len` overflows the address space.
    #[inline]
    pub fn with_len(start: u64, len: u64) -> Self {
        let end = start
            .checked_add(len)
            .unwrap_or_else(|| panic!("address range {start:#x}+{len} wraps the address space"));
        Self::new(start, end)
    }

    /// First byte of the range.
    #[inline(always)]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// One past the last byte of the range.
    #[inline(always)]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes covered.
    #[inline(always)]
    pub const fn size(&self) -> u64 {
        self.end - self.start
    }

    /// Returns `true` if `addr` lies inside the range.
    #[inline]
    pub const fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }

    /// Returns `true` if the two ranges share at least one byte.
    #[inline]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for AddrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x})", self.start, self.end)
    }
}
