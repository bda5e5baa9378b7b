//! Configuration for the timing model.
//!
//! This module defines every tunable of the pipeline, branch predictor and
//! instruction-cache models. It provides:
//! 1. **Defaults:** The reference microcontroller's observed latencies and table sizes.
//! 2. **Structures:** One section per component, deserializable from JSON.
//! 3. **Validation:** Geometry and window checks performed before a model is built.
//!
//! Every field has a default, so a partial JSON document only needs to name
//! what it overrides.

use serde::{Deserialize, Serialize};

use crate::common::counter::MAX_COUNTER_BITS;
use crate::common::error::ConfigError;

/// Baseline values for the reference single-issue microcontroller core.
mod defaults {
    /// Seed for the model's random source (divide latency, i-cache miss penalty).
    pub const SEED: u64 = 0x5EED_CAFE;

    /// Multiplier occupancy in cycles; the product is visible one cycle later.
    pub const MULT_LATENCY: u64 = 6;

    /// Shortest divide (early-out on small operands).
    pub const DIV_LATENCY_MIN: u64 = 2;

    /// Longest divide (one quotient bit per cycle plus setup).
    pub const DIV_LATENCY_MAX: u64 = 33;

    /// Fixed latency of a CSR read into a destination register.
    pub const CSR_LATENCY: u64 = 5;

    /// Stall charged when a load hits an in-flight store.
    pub const STORE_FORWARD_PENALTY: u64 = 5;

    /// Extra result latency for a forwarded load narrower than a word.
    pub const SUBWORD_FORWARD_EXTRA: u64 = 2;

    /// Cycles lost on any branch or jump misprediction.
    pub const MISPREDICT_PENALTY: u64 = 3;

    /// Branch history table entries.
    pub const BHT_ENTRIES: usize = 128;

    /// Local history bits kept per BHT entry.
    pub const BHT_HISTORY_BITS: u8 = 1;

    /// Width of each BHT saturating counter.
    pub const BHT_COUNTER_BITS: u8 = 2;

    /// Branch target buffer entries.
    pub const BTB_ENTRIES: usize = 40;

    /// Return address stack depth.
    pub const RAS_ENTRIES: usize = 2;

    /// Total instruction cache capacity (16 KiB).
    pub const ICACHE_CAPACITY: u64 = 16 * 1024;

    /// Number of two-way buckets.
    pub const ICACHE_BUCKETS: usize = 512;

    /// Shortest flash line-fill on an i-cache miss.
    pub const ICACHE_MISS_MIN: u64 = 3;

    /// Longest flash line-fill on an i-cache miss.
    pub const ICACHE_MISS_MAX: u64 = 10;
}

/// Largest supported per-entry BHT history.
pub const MAX_HISTORY_BITS: u8 = 8;

/// Root configuration of the timing model.
///
/// # Examples
///
/// ```
/// use rvtiming_core::config::TimingConfig;
///
/// let json = r#"{
///     "seed": 7,
///     "pipeline": { "mult_latency": 3 },
///     "icache": { "enabled": false }
/// }"#;
///
/// let config: TimingConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.pipeline.mult_latency, 3);
/// assert_eq!(config.pipeline.csr_latency, 5);
/// assert!(!config.icache.enabled);
/// assert_eq!(config.branch.btb_entries, 40);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Seed for the random source shared by the divider and i-cache models.
    #[serde(default = "TimingConfig::default_seed")]
    pub seed: u64,
    /// Functional-unit and hazard latencies.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Branch predictor geometry and penalty.
    #[serde(default)]
    pub branch: BranchConfig,
    /// Instruction cache geometry and miss window.
    #[serde(default)]
    pub icache: ICacheConfig,
}

impl TimingConfig {
    const fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Checks that every section describes a model that can be built.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, in section order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()?;
        self.branch.validate()?;
        self.icache.validate()
    }

    /// Parses a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the text is not valid JSON for this schema
    /// or the resulting configuration fails [`TimingConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            seed: defaults::SEED,
            pipeline: PipelineConfig::default(),
            branch: BranchConfig::default(),
            icache: ICacheConfig::default(),
        }
    }
}

/// Failure to load a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document is not valid JSON for [`TimingConfig`].
    #[error("malformed timing configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but describes an impossible model.
    #[error("invalid timing configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Functional-unit latencies and hazard penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Cycles the single multiplier stays busy per multiply.
    #[serde(default = "PipelineConfig::default_mult_latency")]
    pub mult_latency: u64,
    /// Lower bound of the divider's data-dependent latency.
    #[serde(default = "PipelineConfig::default_div_latency_min")]
    pub div_latency_min: u64,
    /// Upper bound (inclusive) of the divider's data-dependent latency.
    #[serde(default = "PipelineConfig::default_div_latency_max")]
    pub div_latency_max: u64,
    /// Result latency of a CSR read.
    #[serde(default = "PipelineConfig::default_csr_latency")]
    pub csr_latency: u64,
    /// Stall charged when a load overlaps an in-flight store.
    #[serde(default = "PipelineConfig::default_store_forward_penalty")]
    pub store_forward_penalty: u64,
    /// Additional result latency for a forwarded sub-word load.
    #[serde(default = "PipelineConfig::default_subword_forward_extra")]
    pub subword_forward_extra: u64,
}

impl PipelineConfig {
    const fn default_mult_latency() -> u64 {
        defaults::MULT_LATENCY
    }
    const fn default_div_latency_min() -> u64 {
        defaults::DIV_LATENCY_MIN
    }
    const fn default_div_latency_max() -> u64 {
        defaults::DIV_LATENCY_MAX
    }
    const fn default_csr_latency() -> u64 {
        defaults::CSR_LATENCY
    }
    const fn default_store_forward_penalty() -> u64 {
        defaults::STORE_FORWARD_PENALTY
    }
    const fn default_subword_forward_extra() -> u64 {
        defaults::SUBWORD_FORWARD_EXTRA
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mult_latency == 0 {
            return Err(ConfigError::ZeroSized {
                field: "pipeline.mult_latency",
            });
        }
        if self.div_latency_min == 0 {
            return Err(ConfigError::ZeroSized {
                field: "pipeline.div_latency_min",
            });
        }
        if self.div_latency_min > self.div_latency_max {
            return Err(ConfigError::InvertedWindow {
                field: "pipeline.div_latency",
                min: self.div_latency_min,
                max: self.div_latency_max,
            });
        }
        if self.csr_latency == 0 {
            return Err(ConfigError::ZeroSized {
                field: "pipeline.csr_latency",
            });
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mult_latency: defaults::MULT_LATENCY,
            div_latency_min: defaults::DIV_LATENCY_MIN,
            div_latency_max: defaults::DIV_LATENCY_MAX,
            csr_latency: defaults::CSR_LATENCY,
            store_forward_penalty: defaults::STORE_FORWARD_PENALTY,
            subword_forward_extra: defaults::SUBWORD_FORWARD_EXTRA,
        }
    }
}

/// Branch predictor tables and misprediction cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Cycles lost on a wrong direction or target.
    #[serde(default = "BranchConfig::default_mispredict_penalty")]
    pub mispredict_penalty: u64,
    /// Number of BHT entries.
    #[serde(default = "BranchConfig::default_bht_entries")]
    pub bht_entries: usize,
    /// Local history bits per BHT entry (0 gives a plain bimodal table).
    #[serde(default = "BranchConfig::default_bht_history_bits")]
    pub bht_history_bits: u8,
    /// Width of each BHT counter.
    #[serde(default = "BranchConfig::default_bht_counter_bits")]
    pub bht_counter_bits: u8,
    /// Number of BTB entries.
    #[serde(default = "BranchConfig::default_btb_entries")]
    pub btb_entries: usize,
    /// Depth of the return address stack.
    #[serde(default = "BranchConfig::default_ras_entries")]
    pub ras_entries: usize,
}

impl BranchConfig {
    const fn default_mispredict_penalty() -> u64 {
        defaults::MISPREDICT_PENALTY
    }
    const fn default_bht_entries() -> usize {
        defaults::BHT_ENTRIES
    }
    const fn default_bht_history_bits() -> u8 {
        defaults::BHT_HISTORY_BITS
    }
    const fn default_bht_counter_bits() -> u8 {
        defaults::BHT_COUNTER_BITS
    }
    const fn default_btb_entries() -> usize {
        defaults::BTB_ENTRIES
    }
    const fn default_ras_entries() -> usize {
        defaults::RAS_ENTRIES
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("branch.bht_entries", self.bht_entries),
            ("branch.btb_entries", self.btb_entries),
            ("branch.ras_entries", self.ras_entries),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroSized { field });
            }
        }
        if self.bht_history_bits > MAX_HISTORY_BITS {
            return Err(ConfigError::BitWidth {
                field: "branch.bht_history_bits",
                value: self.bht_history_bits,
                min: 0,
                max: MAX_HISTORY_BITS,
            });
        }
        if !(1..=MAX_COUNTER_BITS).contains(&self.bht_counter_bits) {
            return Err(ConfigError::BitWidth {
                field: "branch.bht_counter_bits",
                value: self.bht_counter_bits,
                min: 1,
                max: MAX_COUNTER_BITS,
            });
        }
        Ok(())
    }
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            mispredict_penalty: defaults::MISPREDICT_PENALTY,
            bht_entries: defaults::BHT_ENTRIES,
            bht_history_bits: defaults::BHT_HISTORY_BITS,
            bht_counter_bits: defaults::BHT_COUNTER_BITS,
            btb_entries: defaults::BTB_ENTRIES,
            ras_entries: defaults::RAS_ENTRIES,
        }
    }
}

/// Instruction cache geometry and miss cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ICacheConfig {
    /// When false every fetch is a zero-cost pass-through.
    #[serde(default = "ICacheConfig::default_enabled")]
    pub enabled: bool,
    /// Total capacity in bytes; resident blocks are aligned to it.
    #[serde(default = "ICacheConfig::default_capacity")]
    pub capacity_bytes: u64,
    /// Number of two-way buckets the capacity is split into.
    #[serde(default = "ICacheConfig::default_buckets")]
    pub buckets: usize,
    /// Shortest line-fill penalty on a miss.
    #[serde(default = "ICacheConfig::default_miss_min")]
    pub miss_penalty_min: u64,
    /// Longest line-fill penalty on a miss (inclusive).
    #[serde(default = "ICacheConfig::default_miss_max")]
    pub miss_penalty_max: u64,
}

impl ICacheConfig {
    const fn default_enabled() -> bool {
        true
    }
    const fn default_capacity() -> u64 {
        defaults::ICACHE_CAPACITY
    }
    const fn default_buckets() -> usize {
        defaults::ICACHE_BUCKETS
    }
    const fn default_miss_min() -> u64 {
        defaults::ICACHE_MISS_MIN
    }
    const fn default_miss_max() -> u64 {
        defaults::ICACHE_MISS_MAX
    }

    /// Bytes covered by one way of one bucket.
    pub const fn line_bytes(&self) -> u64 {
        self.capacity_bytes / (self.buckets as u64 * 2)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.buckets == 0 {
            return Err(ConfigError::ZeroSized {
                field: "icache.buckets",
            });
        }
        if !self.buckets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "icache.buckets",
                value: self.buckets as u64,
            });
        }
        if !self.capacity_bytes.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "icache.capacity_bytes",
                value: self.capacity_bytes,
            });
        }
        if self.line_bytes() == 0 {
            return Err(ConfigError::CacheGeometry {
                capacity: self.capacity_bytes,
                buckets: self.buckets,
            });
        }
        if self.miss_penalty_min > self.miss_penalty_max {
            return Err(ConfigError::InvertedWindow {
                field: "icache.miss_penalty",
                min: self.miss_penalty_min,
                max: self.miss_penalty_max,
            });
        }
        Ok(())
    }
}

impl Default for ICacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity_bytes: defaults::ICACHE_CAPACITY,
            buckets: defaults::ICACHE_BUCKETS,
            miss_penalty_min: defaults::ICACHE_MISS_MIN,
            miss_penalty_max: defaults::ICACHE_MISS_MAX,
        }
    }
}
