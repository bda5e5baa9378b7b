//! Return Address Stack (RAS).
//!
//! The RAS pushes the fall-through address of every call and pops it on the
//! matching return. The reference core keeps only a couple of entries; when a
//! push finds the stack full the *oldest* address is dropped, so deep call
//! chains lose their outermost frames first.

use std::collections::VecDeque;

/// Return Address Stack structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ras {
    /// Oldest entry at the front, top of stack at the back.
    stack: VecDeque<u64>,
    /// Maximum number of entries kept.
    capacity: usize,
}

impl Ras {
    /// Creates an empty Return Address Stack holding up to `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RAS must hold at least one entry");
        Self {
            stack: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` if no return address is held.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Pushes a return address, evicting the oldest entry if full.
    ///
    /// # Arguments
    ///
    /// * `addr` - The return address to push.
    pub fn push(&mut self, addr: u64) {
        if self.stack.len() == self.capacity {
            let _ = self.stack.pop_front();
        }
        self.stack.push_back(addr);
    }

    /// Pops the most recently pushed return address.
    ///
    /// # Returns
    ///
    /// The popped return address, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<u64> {
        self.stack.pop_back()
    }

    /// Peeks at the top of the stack without removing the entry.
    pub fn top(&self) -> Option<u64> {
        self.stack.back().copied()
    }
}
