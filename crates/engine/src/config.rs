//! Configuration system for the simulator.
//!
//! This module defines all configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline machine constants (station counts, latencies,
//!    cache geometry).
//! 2. **Structures:** Hierarchical config for reservation stations, per-class
//!    latencies, and the data cache.
//!
//! Configuration is supplied as JSON by the UI collaborator or the CLI, or
//! use `Config::default()`.

use crate::isa::OpClass;
use serde::Deserialize;

/// Default configuration constants for the simulator.
mod defaults {
    /// Floating-point adder reservation stations.
    pub const RS_ADD: usize = 3;

    /// Floating-point multiplier reservation stations.
    pub const RS_MULT: usize = 2;

    /// Load-unit reservation stations.
    pub const RS_LOAD: usize = 3;

    /// Store-unit reservation stations.
    pub const RS_STORE: usize = 3;

    /// Integer-ALU reservation stations (shared with branches).
    pub const RS_INTEGER: usize = 4;

    /// Load latency in cycles (before any miss penalty).
    pub const LAT_LOAD: u64 = 2;

    /// Store latency in cycles.
    pub const LAT_STORE: u64 = 2;

    /// Floating-point add latency in cycles.
    pub const LAT_FP_ADD: u64 = 2;

    /// Floating-point subtract latency in cycles.
    pub const LAT_FP_SUB: u64 = 2;

    /// Floating-point multiply latency in cycles.
    pub const LAT_FP_MULT: u64 = 10;

    /// Floating-point divide latency in cycles.
    pub const LAT_FP_DIV: u64 = 40;

    /// Integer ALU latency in cycles.
    pub const LAT_INT_ALU: u64 = 1;

    /// Branch resolution latency in cycles.
    pub const LAT_BRANCH: u64 = 1;

    /// Data cache enabled by default.
    pub const CACHE_ENABLED: bool = true;

    /// Cache block size in words-addressable bytes.
    pub const CACHE_BLOCK_BYTES: u64 = 4;

    /// Total cache size in bytes.
    pub const CACHE_SIZE_BYTES: u64 = 16;

    /// Extra load latency on a cache miss, in cycles.
    pub const CACHE_MISS_PENALTY: u64 = 10;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Deserializing from JSON (typical UI usage):
///
/// ```
/// use tomsim_core::config::Config;
///
/// let json = r#"{
///     "stations": { "mult": 4 },
///     "latencies": { "fp_div": 20 },
///     "cache": { "enabled": false }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.stations.mult, 4);
/// assert_eq!(config.latencies.fp_div, 20);
/// assert_eq!(config.stations.add, 3);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Reservation-station counts per functional-unit class.
    #[serde(default)]
    pub stations: StationConfig,
    /// Execution latencies per operation class.
    #[serde(default)]
    pub latencies: LatencyConfig,
    /// Data cache geometry and penalty.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Reservation-station counts per functional-unit class.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    /// FP adder stations (FP add/subtract).
    #[serde(default = "StationConfig::default_add")]
    pub add: usize,

    /// FP multiplier stations (FP multiply/divide).
    #[serde(default = "StationConfig::default_mult")]
    pub mult: usize,

    /// Load stations.
    #[serde(default = "StationConfig::default_load")]
    pub load: usize,

    /// Store stations.
    #[serde(default = "StationConfig::default_store")]
    pub store: usize,

    /// Integer stations (integer ALU and branches).
    #[serde(default = "StationConfig::default_integer")]
    pub integer: usize,
}

impl StationConfig {
    fn default_add() -> usize {
        defaults::RS_ADD
    }

    fn default_mult() -> usize {
        defaults::RS_MULT
    }

    fn default_load() -> usize {
        defaults::RS_LOAD
    }

    fn default_store() -> usize {
        defaults::RS_STORE
    }

    fn default_integer() -> usize {
        defaults::RS_INTEGER
    }

    /// Station count for one unit class.
    pub fn count(&self, unit: crate::isa::UnitClass) -> usize {
        use crate::isa::UnitClass;
        match unit {
            UnitClass::Add => self.add,
            UnitClass::Mult => self.mult,
            UnitClass::Load => self.load,
            UnitClass::Store => self.store,
            UnitClass::Integer => self.integer,
        }
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            add: defaults::RS_ADD,
            mult: defaults::RS_MULT,
            load: defaults::RS_LOAD,
            store: defaults::RS_STORE,
            integer: defaults::RS_INTEGER,
        }
    }
}

/// Execution latencies per operation class, in cycles.
///
/// Unknown keys are rejected so a typo in a latency table is a
/// deserialization error rather than a silently-default run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatencyConfig {
    /// Load latency before any cache-miss penalty.
    #[serde(default = "LatencyConfig::default_load")]
    pub load: u64,

    /// Store latency.
    #[serde(default = "LatencyConfig::default_store")]
    pub store: u64,

    /// FP add latency.
    #[serde(default = "LatencyConfig::default_fp_add")]
    pub fp_add: u64,

    /// FP subtract latency.
    #[serde(default = "LatencyConfig::default_fp_sub")]
    pub fp_sub: u64,

    /// FP multiply latency.
    #[serde(default = "LatencyConfig::default_fp_mult")]
    pub fp_mult: u64,

    /// FP divide latency.
    #[serde(default = "LatencyConfig::default_fp_div")]
    pub fp_div: u64,

    /// Integer ALU latency.
    #[serde(default = "LatencyConfig::default_int_alu")]
    pub int_alu: u64,

    /// Branch resolution latency.
    #[serde(default = "LatencyConfig::default_branch")]
    pub branch: u64,
}

impl LatencyConfig {
    fn default_load() -> u64 {
        defaults::LAT_LOAD
    }

    fn default_store() -> u64 {
        defaults::LAT_STORE
    }

    fn default_fp_add() -> u64 {
        defaults::LAT_FP_ADD
    }

    fn default_fp_sub() -> u64 {
        defaults::LAT_FP_SUB
    }

    fn default_fp_mult() -> u64 {
        defaults::LAT_FP_MULT
    }

    fn default_fp_div() -> u64 {
        defaults::LAT_FP_DIV
    }

    fn default_int_alu() -> u64 {
        defaults::LAT_INT_ALU
    }

    fn default_branch() -> u64 {
        defaults::LAT_BRANCH
    }

    /// Latency for one operation class (excluding cache penalties).
    pub fn for_class(&self, class: OpClass) -> u64 {
        match class {
            OpClass::Load => self.load,
            OpClass::Store => self.store,
            OpClass::FpAdd => self.fp_add,
            OpClass::FpSub => self.fp_sub,
            OpClass::FpMult => self.fp_mult,
            OpClass::FpDiv => self.fp_div,
            OpClass::IntAlu => self.int_alu,
            OpClass::Branch => self.branch,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            load: defaults::LAT_LOAD,
            store: defaults::LAT_STORE,
            fp_add: defaults::LAT_FP_ADD,
            fp_sub: defaults::LAT_FP_SUB,
            fp_mult: defaults::LAT_FP_MULT,
            fp_div: defaults::LAT_FP_DIV,
            int_alu: defaults::LAT_INT_ALU,
            branch: defaults::LAT_BRANCH,
        }
    }
}

/// Data cache configuration.
///
/// The cache is fully associative with strict LRU eviction; it only affects
/// load latency.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Enable the cache. When disabled every access hits with no penalty.
    #[serde(default = "CacheConfig::default_enabled")]
    pub enabled: bool,

    /// Block size in bytes.
    #[serde(default = "CacheConfig::default_block_bytes")]
    pub block_bytes: u64,

    /// Total cache size in bytes; capacity is `size_bytes / block_bytes`.
    #[serde(default = "CacheConfig::default_size_bytes")]
    pub size_bytes: u64,

    /// Extra cycles a missing load spends executing.
    #[serde(default = "CacheConfig::default_miss_penalty")]
    pub miss_penalty: u64,
}

impl CacheConfig {
    fn default_enabled() -> bool {
        defaults::CACHE_ENABLED
    }

    fn default_block_bytes() -> u64 {
        defaults::CACHE_BLOCK_BYTES
    }

    fn default_size_bytes() -> u64 {
        defaults::CACHE_SIZE_BYTES
    }

    fn default_miss_penalty() -> u64 {
        defaults::CACHE_MISS_PENALTY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::CACHE_ENABLED,
            block_bytes: defaults::CACHE_BLOCK_BYTES,
            size_bytes: defaults::CACHE_SIZE_BYTES,
            miss_penalty: defaults::CACHE_MISS_PENALTY,
        }
    }
}
