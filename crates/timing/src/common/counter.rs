//! Fixed-width saturating counters.
//!
//! Direction predictors are built from small counters that count up on a
//! taken outcome and down on a not-taken one, sticking at both ends of their
//! range. `SatCounter` carries its width alongside the value so the range is
//! checked rather than assumed by every caller.

/// Widest counter supported; keeps `max()` representable in a `u8`.
pub const MAX_COUNTER_BITS: u8 = 7;

/// An unsigned counter confined to `0..=2^bits - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SatCounter {
    value: u8,
    bits: u8,
}

impl SatCounter {
    /// Creates a counter of the given width, starting at zero (strongly not-taken).
    ///
    /// # Panics
    ///
    /// Panics if `bits` is zero or wider than [`MAX_COUNTER_BITS`].
    pub fn new(bits: u8) -> Self {
        assert!(
            (1..=MAX_COUNTER_BITS).contains(&bits),
            "saturating counter width {bits} outside 1..={MAX_COUNTER_BITS}"
        );
        Self { value: 0, bits }
    }

    /// Current value.
    #[inline(always)]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Largest value the counter can hold.
    #[inline(always)]
    pub const fn max(&self) -> u8 {
        (1 << self.bits) - 1
    }

    /// Midpoint of the range; values at or above it predict "taken".
    #[inline(always)]
    pub const fn threshold(&self) -> u8 {
        1 << (self.bits - 1)
    }

    /// Returns `true` when the counter sits in the upper half of its range.
    #[inline(always)]
    pub const fn is_set(&self) -> bool {
        self.value >= self.threshold()
    }

    /// Counts up, sticking at `max()`.
    #[inline]
    pub fn increment(&mut self) {
        if self.value < self.max() {
            self.value += 1;
        }
    }

    /// Counts down, sticking at zero.
    #[inline]
    pub fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Moves toward `max()` if `up`, otherwise toward zero.
    #[inline]
    pub fn update(&mut self, up: bool) {
        if up {
            self.increment();
        } else {
            self.decrement();
        }
    }
}
