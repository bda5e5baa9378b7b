//! Instruction cache timing proxy.
//!
//! The reference core fetches from flash through a small two-way instruction
//! cache. This module models only its *timing*: instruction words always come
//! unmodified from the functional backing store, while the cache decides
//! whether the fetch costs a line fill.
//!
//! # Address decomposition
//!
//! With `C` bytes of capacity split into `B` two-way buckets, each way of a
//! bucket covers `L = C / (2 × B)` bytes:
//!
//! - **Tag:** `(pc / L) mod B` selects the bucket.
//! - **Block:** `pc & !(C - 1)` identifies the `C`-aligned region held by a way.
//!
//! With the defaults (16 KiB, 512 buckets) a way covers a 16-byte line.

use tracing::{debug, trace};

use crate::config::ICacheConfig;
use crate::core::pipeline::PipelineTiming;
use crate::soc::traits::InstructionFetch;
use crate::stats::StallCause;

/// One two-way bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheBucket {
    /// Resident block address per way, `None` while empty.
    ways: [Option<u64>; 2],
    /// Index of the least recently used way.
    lru: usize,
}

impl CacheBucket {
    /// Block held by `way` (0 or 1).
    pub const fn way(&self, way: usize) -> Option<u64> {
        self.ways[way]
    }

    /// Index of the way that will be evicted next.
    pub const fn lru(&self) -> usize {
        self.lru
    }

    /// Looks `block` up, refreshing recency on a hit.
    fn touch(&mut self, block: u64) -> bool {
        match self.ways.iter().position(|&w| w == Some(block)) {
            Some(way) => {
                self.lru = way ^ 1;
                true
            }
            None => false,
        }
    }

    /// Replaces the least recently used way with `block`, returning the evicted block.
    fn fill(&mut self, block: u64) -> Option<u64> {
        let victim = self.lru;
        let evicted = self.ways[victim].replace(block);
        self.lru ^= 1;
        evicted
    }
}

/// Timing state of the instruction cache.
#[derive(Debug, Clone)]
pub struct InstructionCache {
    buckets: Vec<CacheBucket>,
    line_shift: u32,
    block_mask: u64,
    enabled: bool,
    miss_min: u64,
    miss_max: u64,
}

impl InstructionCache {
    /// Creates an empty cache.
    ///
    /// `config` is expected to have passed `TimingConfig::validate`.
    pub fn new(config: &ICacheConfig) -> Self {
        Self {
            buckets: vec![CacheBucket::default(); config.buckets],
            line_shift: config.line_bytes().trailing_zeros(),
            block_mask: !(config.capacity_bytes - 1),
            enabled: config.enabled,
            miss_min: config.miss_penalty_min,
            miss_max: config.miss_penalty_max,
        }
    }

    /// Returns `true` if fetches are being timed.
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Bucket selected by `pc`.
    #[inline]
    pub fn tag(&self, pc: u64) -> usize {
        ((pc >> self.line_shift) as usize) & (self.buckets.len() - 1)
    }

    /// Capacity-aligned block containing `pc`.
    #[inline]
    pub const fn block(&self, pc: u64) -> u64 {
        pc & self.block_mask
    }

    /// The bucket `pc` maps to.
    pub fn bucket(&self, pc: u64) -> &CacheBucket {
        &self.buckets[self.tag(pc)]
    }

    /// Times a fetch at `pc`, charging a line fill on a miss.
    ///
    /// Returns `true` on a hit. A disabled cache reports every fetch as a hit.
    pub fn access(&mut self, timing: &mut PipelineTiming, pc: u64) -> bool {
        if !self.enabled {
            return true;
        }
        let tag = self.tag(pc);
        let block = self.block(pc);
        let bucket = &mut self.buckets[tag];

        if bucket.touch(block) {
            timing.stats_mut().icache_hits += 1;
            trace!(pc = format_args!("{pc:#x}"), tag, "icache hit");
            return true;
        }

        let evicted = bucket.fill(block);
        let penalty = timing.random_cycles(self.miss_min, self.miss_max);
        timing.stats_mut().icache_misses += 1;
        debug!(
            pc = format_args!("{pc:#x}"),
            tag,
            block = format_args!("{block:#x}"),
            evicted = ?evicted,
            penalty,
            "icache miss"
        );
        timing.stall_for(StallCause::Fetch, penalty);
        false
    }

    /// Times a fetch at `pc` and returns the word read from `mem`.
    pub fn fetch<M: InstructionFetch + ?Sized>(
        &mut self,
        timing: &mut PipelineTiming,
        mem: &mut M,
        pc: u64,
    ) -> u32 {
        let _ = self.access(timing, pc);
        mem.fetch_u32(pc)
    }

    /// Borrows the cache, the pipeline model and a backing store together as
    /// an [`InstructionFetch`] that can stand in for the plain store.
    pub fn bind<'a, M: InstructionFetch + ?Sized>(
        &'a mut self,
        timing: &'a mut PipelineTiming,
        mem: &'a mut M,
    ) -> TimedFetch<'a, M> {
        TimedFetch {
            cache: self,
            timing,
            mem,
        }
    }
}

/// A backing store whose fetches are timed by an [`InstructionCache`].
#[derive(Debug)]
pub struct TimedFetch<'a, M: ?Sized> {
    cache: &'a mut InstructionCache,
    timing: &'a mut PipelineTiming,
    mem: &'a mut M,
}

impl<M: InstructionFetch + ?Sized> InstructionFetch for TimedFetch<'_, M> {
    fn fetch_u32(&mut self, addr: u64) -> u32 {
        self.cache.fetch(self.timing, self.mem, addr)
    }
}
