//! Global model constants.

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// Width in bytes of a full machine word; narrower loads are "sub-word".
pub const WORD_BYTES: u64 = 4;

/// Size in bytes of an uncompressed RISC-V instruction.
pub const INSTRUCTION_SIZE_32: u64 = 4;
