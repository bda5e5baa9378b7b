//! Instruction fetch capability.
//!
//! This is the single operation the timing model needs from the functional
//! memory system. Backing stores implement it directly; the instruction
//! cache's [`TimedFetch`](crate::core::units::cache::TimedFetch) adapter
//! implements it too, so a timed fetch path can be handed to any code that
//! expects a plain one.

/// Reads 32-bit instruction words from the simulated address space.
pub trait InstructionFetch {
    /// Returns the little-endian 32-bit word at `addr`.
    fn fetch_u32(&mut self, addr: u64) -> u32;
}

impl<T: InstructionFetch + ?Sized> InstructionFetch for &mut T {
    fn fetch_u32(&mut self, addr: u64) -> u32 {
        (**self).fetch_u32(addr)
    }
}

impl<T: InstructionFetch + ?Sized> InstructionFetch for Box<T> {
    fn fetch_u32(&mut self, addr: u64) -> u32 {
        (**self).fetch_u32(addr)
    }
}
