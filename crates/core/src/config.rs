//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline hierarchy constants (L1/L2/L3 geometry and
//!    latencies, memory timing).
//! 2. **Structures:** Per-level cache policy, write-policy flags, and the
//!    root simulation config.
//! 3. **Validation:** The construction-time policy checks (power-of-two
//!    sizes, divisibility, block count consistency).
//!
//! Configuration is supplied as JSON via the CLI's `--config` flag, or use
//! `SimConfig::default()` for the stock three-level hierarchy.

use serde::Deserialize;

use crate::common::error::SimError;

/// Default configuration constants for the simulator.
///
/// These values reproduce the stock three-level hierarchy used when no
/// configuration file is supplied.
pub mod defaults {
    /// L1 capacity in bytes (16 KiB).
    pub const L1_SIZE: u32 = 16 * 1024;

    /// L1 associativity (direct-mapped).
    pub const L1_WAYS: u32 = 1;

    /// L1 hit latency in cycles.
    pub const L1_HIT_LATENCY: u32 = 1;

    /// L1 miss latency in cycles.
    pub const L1_MISS_LATENCY: u32 = 1;

    /// L2 capacity in bytes (128 KiB).
    pub const L2_SIZE: u32 = 128 * 1024;

    /// L2 associativity.
    pub const L2_WAYS: u32 = 8;

    /// L2 hit latency in cycles.
    pub const L2_HIT_LATENCY: u32 = 8;

    /// L2 miss latency in cycles.
    pub const L2_MISS_LATENCY: u32 = 8;

    /// L3 capacity in bytes (2 MiB).
    pub const L3_SIZE: u32 = 2 * 1024 * 1024;

    /// L3 associativity.
    pub const L3_WAYS: u32 = 16;

    /// L3 hit latency in cycles.
    pub const L3_HIT_LATENCY: u32 = 20;

    /// L3 miss latency in cycles.
    pub const L3_MISS_LATENCY: u32 = 100;

    /// Block size in bytes, shared by every default level.
    ///
    /// Matches typical processor cache line sizes.
    pub const BLOCK_SIZE: u32 = 64;

    /// Cycles charged per byte fetched from the backing memory.
    pub const MEMORY_BYTE_LATENCY: u32 = 100;
}

/// Immutable descriptor of one cache level's geometry and timing.
///
/// `block_num` is carried explicitly (rather than derived) so that the
/// consistency rule `block_num * block_size == cache_size` is checked like
/// every other constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Total capacity in bytes; must be a positive power of two.
    pub cache_size: u32,
    /// Bytes per block; a power of two dividing `cache_size`.
    pub block_size: u32,
    /// Number of blocks (`cache_size / block_size`).
    pub block_num: u32,
    /// Ways per set; must divide `block_num`.
    pub associativity: u32,
    /// Cycle cost of a hit.
    pub hit_latency: u32,
    /// Cycle cost of a miss.
    pub miss_latency: u32,
}

impl CachePolicy {
    /// Builds a policy from capacity, block size, and associativity,
    /// deriving `block_num`.
    pub fn new(
        cache_size: u32,
        block_size: u32,
        associativity: u32,
        hit_latency: u32,
        miss_latency: u32,
    ) -> Self {
        Self {
            cache_size,
            block_size,
            block_num: if block_size == 0 {
                0
            } else {
                cache_size / block_size
            },
            associativity,
            hit_latency,
            miss_latency,
        }
    }

    /// Validates the geometry constraints.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidPolicy`] naming the first violated
    /// constraint: `cache_size` or `block_size` not a positive power of
    /// two, `block_size` not dividing `cache_size`, `block_num` not
    /// consistent with the other sizes, or `associativity` not dividing
    /// `block_num`.
    pub fn validate(&self) -> Result<(), SimError> {
        if !is_power_of_two(self.cache_size) {
            return Err(SimError::InvalidPolicy(format!(
                "cache size {} is not a positive power of two",
                self.cache_size
            )));
        }
        if !is_power_of_two(self.block_size) {
            return Err(SimError::InvalidPolicy(format!(
                "block size {} is not a positive power of two",
                self.block_size
            )));
        }
        if self.cache_size % self.block_size != 0 {
            return Err(SimError::InvalidPolicy(format!(
                "block size {} does not divide cache size {}",
                self.block_size, self.cache_size
            )));
        }
        if self.block_num * self.block_size != self.cache_size {
            return Err(SimError::InvalidPolicy(format!(
                "block count {} x block size {} != cache size {}",
                self.block_num, self.block_size, self.cache_size
            )));
        }
        if self.associativity == 0 || self.block_num % self.associativity != 0 {
            return Err(SimError::InvalidPolicy(format!(
                "associativity {} does not divide block count {}",
                self.associativity, self.block_num
            )));
        }
        Ok(())
    }

    /// Number of sets (`block_num / associativity`).
    ///
    /// Only meaningful on a validated policy.
    #[inline]
    pub fn num_sets(&self) -> u32 {
        self.block_num / self.associativity
    }
}

fn is_power_of_two(n: u32) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

/// Write-policy flags of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WritePolicy {
    /// `true` = write-back (propagate dirty blocks on eviction);
    /// `false` = write-through (propagate every store immediately).
    #[serde(default = "WritePolicy::default_flag")]
    pub write_back: bool,

    /// `true` = write-allocate (fill on write miss);
    /// `false` = write-around (forward the store downward unallocated).
    #[serde(default = "WritePolicy::default_flag")]
    pub write_allocate: bool,
}

impl WritePolicy {
    /// Both flags default to enabled.
    fn default_flag() -> bool {
        true
    }
}

impl Default for WritePolicy {
    fn default() -> Self {
        Self {
            write_back: true,
            write_allocate: true,
        }
    }
}

/// Configuration of one cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelConfig {
    /// Enable this cache level.
    #[serde(default = "LevelConfig::default_enabled")]
    pub enabled: bool,

    /// Total capacity in bytes.
    pub cache_size: u32,

    /// Block size in bytes.
    #[serde(default = "LevelConfig::default_block_size")]
    pub block_size: u32,

    /// Associativity (number of ways).
    pub associativity: u32,

    /// Hit latency in cycles.
    pub hit_latency: u32,

    /// Miss latency in cycles.
    pub miss_latency: u32,

    /// Write-policy flags.
    #[serde(default)]
    pub write: WritePolicy,
}

impl LevelConfig {
    /// Levels present in a configuration file are enabled by default.
    fn default_enabled() -> bool {
        true
    }

    /// Returns the default block size in bytes.
    fn default_block_size() -> u32 {
        defaults::BLOCK_SIZE
    }

    /// Converts this level configuration into a cache policy descriptor.
    pub fn policy(&self) -> CachePolicy {
        CachePolicy::new(
            self.cache_size,
            self.block_size,
            self.associativity,
            self.hit_latency,
            self.miss_latency,
        )
    }
}

/// Root configuration structure for a simulation run.
///
/// # Examples
///
/// The default configuration is the stock three-level hierarchy:
///
/// ```
/// use cachesim_core::config::SimConfig;
///
/// let config = SimConfig::default();
/// assert_eq!(config.l1.cache_size, 16 * 1024);
/// assert_eq!(config.l3.associativity, 16);
/// assert!(!config.full_block_fill);
/// ```
///
/// Deserializing a partial override from JSON:
///
/// ```
/// use cachesim_core::config::SimConfig;
///
/// let json = r#"{
///     "l1": {
///         "cache_size": 4096,
///         "associativity": 2,
///         "hit_latency": 1,
///         "miss_latency": 4,
///         "write": { "write_back": true, "write_allocate": false }
///     },
///     "l2": { "enabled": false, "cache_size": 0, "associativity": 1,
///             "hit_latency": 0, "miss_latency": 0 },
///     "l3": { "enabled": false, "cache_size": 0, "associativity": 1,
///             "hit_latency": 0, "miss_latency": 0 },
///     "full_block_fill": true
/// }"#;
///
/// let config: SimConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.l1.cache_size, 4096);
/// assert!(!config.l1.write.write_allocate);
/// assert!(!config.l2.enabled);
/// assert!(config.full_block_fill);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Top-level cache.
    #[serde(default = "SimConfig::default_l1")]
    pub l1: LevelConfig,

    /// Second-level cache.
    #[serde(default = "SimConfig::default_l2")]
    pub l2: LevelConfig,

    /// Third-level cache.
    #[serde(default = "SimConfig::default_l3")]
    pub l3: LevelConfig,

    /// Transfer whole blocks on fill instead of the historical single
    /// byte (see RELEASE_NOTES.md).
    #[serde(default)]
    pub full_block_fill: bool,
}

impl SimConfig {
    /// Returns the default L1 configuration (16 KiB direct-mapped).
    fn default_l1() -> LevelConfig {
        LevelConfig {
            enabled: true,
            cache_size: defaults::L1_SIZE,
            block_size: defaults::BLOCK_SIZE,
            associativity: defaults::L1_WAYS,
            hit_latency: defaults::L1_HIT_LATENCY,
            miss_latency: defaults::L1_MISS_LATENCY,
            write: WritePolicy::default(),
        }
    }

    /// Returns the default L2 configuration (128 KiB 8-way).
    fn default_l2() -> LevelConfig {
        LevelConfig {
            enabled: true,
            cache_size: defaults::L2_SIZE,
            block_size: defaults::BLOCK_SIZE,
            associativity: defaults::L2_WAYS,
            hit_latency: defaults::L2_HIT_LATENCY,
            miss_latency: defaults::L2_MISS_LATENCY,
            write: WritePolicy::default(),
        }
    }

    /// Returns the default L3 configuration (2 MiB 16-way).
    fn default_l3() -> LevelConfig {
        LevelConfig {
            enabled: true,
            cache_size: defaults::L3_SIZE,
            block_size: defaults::BLOCK_SIZE,
            associativity: defaults::L3_WAYS,
            hit_latency: defaults::L3_HIT_LATENCY,
            miss_latency: defaults::L3_MISS_LATENCY,
            write: WritePolicy::default(),
        }
    }

    /// Enabled level configurations, top first.
    pub fn enabled_levels(&self) -> Vec<&LevelConfig> {
        [&self.l1, &self.l2, &self.l3]
            .into_iter()
            .filter(|level| level.enabled)
            .collect()
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            l1: Self::default_l1(),
            l2: Self::default_l2(),
            l3: Self::default_l3(),
            full_block_fill: false,
        }
    }
}
