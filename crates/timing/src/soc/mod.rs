//! Interfaces to the functional memory system.
//!
//! The timing model never stores instruction bytes itself; it fetches them
//! through [`InstructionFetch`]. [`FlatMemory`] is a minimal byte-array
//! implementation used by the trace driver and tests.

/// Flat byte-array backing store.
pub mod memory;

/// Instruction fetch capability.
pub mod traits;

pub use self::memory::FlatMemory;
pub use self::traits::InstructionFetch;
