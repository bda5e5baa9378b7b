//! JSON-lines retirement traces.
//!
//! Each non-empty line holds one [`Retired`] record in retirement order:
//!
//! ```text
//! {"pc": 4096, "effect": {"kind": "mul", "rd": 3}}
//! {"pc": 4100, "reads": [3]}
//! {"pc": 4104, "effect": {"kind": "branch", "target": 4096, "taken": true}}
//! ```
//!
//! Lines starting with `#` are comments. Register indices and address ranges
//! are checked while reading, so a malformed trace is reported with its line
//! number instead of tripping a model invariant later.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::common::constants::{INSTRUCTION_SIZE_32, NUM_REGS, WORD_BYTES};

const fn default_len() -> u64 {
    INSTRUCTION_SIZE_32
}

const fn default_size() -> u64 {
    WORD_BYTES
}

const fn default_store_cycles() -> u64 {
    1
}

/// Timing-relevant side effect of one retired instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Plain ALU or system instruction with no extra cost.
    #[default]
    None,
    /// Multiply into `rd`.
    Mul {
        /// Destination register.
        rd: usize,
        /// First operand value.
        #[serde(default)]
        a: u64,
        /// Second operand value.
        #[serde(default)]
        b: u64,
    },
    /// Divide or remainder into `rd`.
    Div {
        /// Destination register.
        rd: usize,
        /// Dividend.
        #[serde(default)]
        a: u64,
        /// Divisor.
        #[serde(default)]
        b: u64,
    },
    /// CSR read into `rd`.
    Csr {
        /// Destination register.
        rd: usize,
    },
    /// Load of `size` bytes at `addr` into `rd`.
    Load {
        /// Destination register.
        rd: usize,
        /// Effective address.
        addr: u64,
        /// Access width in bytes.
        #[serde(default = "default_size")]
        size: u64,
        /// Result latency before any forwarding penalty.
        #[serde(default)]
        latency: u64,
    },
    /// Store of `size` bytes at `addr`.
    Store {
        /// Effective address.
        addr: u64,
        /// Access width in bytes.
        #[serde(default = "default_size")]
        size: u64,
        /// Cycles until the store completes.
        #[serde(default = "default_store_cycles")]
        cycles: u64,
    },
    /// Conditional branch resolved to `taken`, with `target` as its taken destination.
    Branch {
        /// Taken destination.
        target: u64,
        /// Resolved direction.
        taken: bool,
    },
    /// Unconditional jump without link.
    Jump {
        /// Destination.
        target: u64,
    },
    /// Jump that links a return address.
    Call {
        /// Destination.
        target: u64,
    },
    /// Return through the link register.
    Ret {
        /// Destination.
        target: u64,
    },
}

/// One retired instruction as seen by the timing model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retired {
    /// Address the instruction was fetched from.
    pub pc: u64,
    /// Encoded length in bytes (2 for compressed instructions).
    #[serde(default = "default_len")]
    pub len: u64,
    /// Source registers read.
    #[serde(default)]
    pub reads: Vec<usize>,
    /// Side effect to charge.
    #[serde(default)]
    pub effect: Effect,
}

impl Retired {
    /// A record with no sources and no side effect.
    pub const fn plain(pc: u64) -> Self {
        Self {
            pc,
            len: INSTRUCTION_SIZE_32,
            reads: Vec::new(),
            effect: Effect::None,
        }
    }

    /// Address of the next sequential instruction.
    pub const fn fall_through(&self) -> u64 {
        self.pc.wrapping_add(self.len)
    }

    /// Destination register written by this record, if any.
    pub const fn dest(&self) -> Option<usize> {
        match self.effect {
            Effect::Mul { rd, .. }
            | Effect::Div { rd, .. }
            | Effect::Csr { rd }
            | Effect::Load { rd, .. } => Some(rd),
            _ => None,
        }
    }

    fn check(&self, line: usize) -> Result<(), TraceError> {
        let dest = self.dest();
        if let Some(&reg) = self.reads.iter().chain(dest.as_ref()).find(|&&r| r >= NUM_REGS) {
            return Err(TraceError::Register { line, reg });
        }
        match self.effect {
            Effect::Load { addr, size, .. } | Effect::Store { addr, size, .. }
                if addr.checked_add(size).is_none() =>
            {
                Err(TraceError::AddressWrap { line, addr, size })
            }
            _ => Ok(()),
        }
    }
}

/// Failure to read a retirement trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
    /// A line is not a valid record.
    #[error("line {line}: malformed record: {source}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A record names a register outside `x0..x31`.
    #[error("line {line}: register x{reg} out of range")]
    Register {
        /// 1-based line number.
        line: usize,
        /// Offending index.
        reg: usize,
    },
    /// A memory access runs past the end of the address space.
    #[error("line {line}: access of {size} bytes at {addr:#x} wraps the address space")]
    AddressWrap {
        /// 1-based line number.
        line: usize,
        /// Effective address.
        addr: u64,
        /// Access width.
        size: u64,
    },
}

/// Streams [`Retired`] records from a JSON-lines source.
#[derive(Debug)]
pub struct TraceReader<R> {
    inner: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps `inner`.
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub const fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<Retired, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) => return Some(Err(e.into())),
            }
            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let line = self.line;
            let record = serde_json::from_str::<Retired>(text)
                .map_err(|source| TraceError::Parse { line, source })
                .and_then(|r| r.check(line).map(|()| r));
            return Some(record);
        }
    }
}

/// Reads a whole trace into memory.
///
/// # Errors
///
/// Returns the first [`TraceError`] encountered.
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<Retired>, TraceError> {
    TraceReader::new(reader).collect()
}
