//! Flat byte-array backing store.
//!
//! Holds a program image at a fixed base address. Reads outside the image
//! return zero bytes; there is no fault model, since functional correctness
//! belongs to the simulator driving the timing model.

use super::traits::InstructionFetch;

/// A contiguous image mapped at `base`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatMemory {
    base: u64,
    data: Vec<u8>,
}

impl FlatMemory {
    /// Maps `data` at `base`.
    pub const fn new(base: u64, data: Vec<u8>) -> Self {
        Self { base, data }
    }

    /// Maps `size` zero bytes at `base`.
    pub fn zeroed(base: u64, size: usize) -> Self {
        Self::new(base, vec![0; size])
    }

    /// First mapped address.
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Number of mapped bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stores a little-endian word at `addr`; bytes outside the image are dropped.
    pub fn write_u32(&mut self, addr: u64, val: u32) {
        for (i, byte) in val.to_le_bytes().into_iter().enumerate() {
            if let Some(slot) = self.offset(addr.wrapping_add(i as u64)) {
                self.data[slot] = byte;
            }
        }
    }

    fn offset(&self, addr: u64) -> Option<usize> {
        let off = usize::try_from(addr.checked_sub(self.base)?).ok()?;
        (off < self.data.len()).then_some(off)
    }

    fn read_u8(&self, addr: u64) -> u8 {
        self.offset(addr).map_or(0, |off| self.data[off])
    }
}

impl InstructionFetch for FlatMemory {
    fn fetch_u32(&mut self, addr: u64) -> u32 {
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_u8(addr.wrapping_add(i as u64));
        }
        u32::from_le_bytes(bytes)
    }
}
