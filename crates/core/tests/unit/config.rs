//! Configuration Tests.
//!
//! Verifies the stock defaults, JSON deserialization with partial
//! overrides, and every policy-validation rule.

use cachesim_core::config::{CachePolicy, SimConfig, WritePolicy};

// ──────────────────────────────────────────────────────────
// Defaults
// ──────────────────────────────────────────────────────────

/// The default configuration is the stock three-level hierarchy.
#[test]
fn default_hierarchy_geometry() {
    let config = SimConfig::default();

    assert_eq!(config.l1.cache_size, 16 * 1024);
    assert_eq!(config.l1.associativity, 1);
    assert_eq!(config.l1.hit_latency, 1);
    assert_eq!(config.l1.miss_latency, 1);

    assert_eq!(config.l2.cache_size, 128 * 1024);
    assert_eq!(config.l2.associativity, 8);
    assert_eq!(config.l2.hit_latency, 8);

    assert_eq!(config.l3.cache_size, 2 * 1024 * 1024);
    assert_eq!(config.l3.associativity, 16);
    assert_eq!(config.l3.miss_latency, 100);

    for level in [&config.l1, &config.l2, &config.l3] {
        assert_eq!(level.block_size, 64);
        assert!(level.enabled);
        assert!(level.write.write_back);
        assert!(level.write.write_allocate);
    }
    assert!(!config.full_block_fill);
}

/// All default policies pass validation.
#[test]
fn default_policies_validate() {
    let config = SimConfig::default();
    for level in config.enabled_levels() {
        level.policy().validate().unwrap();
    }
}

/// `enabled_levels` keeps order and drops disabled levels.
#[test]
fn enabled_levels_filters_in_order() {
    let mut config = SimConfig::default();
    config.l2.enabled = false;
    let levels = config.enabled_levels();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].cache_size, config.l1.cache_size);
    assert_eq!(levels[1].cache_size, config.l3.cache_size);
}

// ──────────────────────────────────────────────────────────
// Deserialization
// ──────────────────────────────────────────────────────────

/// A partial JSON override fills unspecified levels from the defaults.
#[test]
fn json_partial_override() {
    let json = r#"{
        "l1": {
            "cache_size": 4096,
            "block_size": 32,
            "associativity": 4,
            "hit_latency": 2,
            "miss_latency": 10
        }
    }"#;
    let config: SimConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.l1.cache_size, 4096);
    assert_eq!(config.l1.block_size, 32);
    // Unspecified write flags default to write-back + write-allocate.
    assert!(config.l1.write.write_back);
    // l2/l3 fall back to the stock defaults.
    assert_eq!(config.l2.cache_size, 128 * 1024);
    assert_eq!(config.l3.associativity, 16);
}

/// Write-policy flags deserialize independently.
#[test]
fn json_write_policy_flags() {
    let json = r#"{
        "l1": {
            "cache_size": 64,
            "associativity": 1,
            "hit_latency": 1,
            "miss_latency": 1,
            "write": { "write_back": false, "write_allocate": false }
        },
        "l2": { "enabled": false, "cache_size": 0, "associativity": 1,
                "hit_latency": 0, "miss_latency": 0 },
        "l3": { "enabled": false, "cache_size": 0, "associativity": 1,
                "hit_latency": 0, "miss_latency": 0 }
    }"#;
    let config: SimConfig = serde_json::from_str(json).unwrap();
    assert!(!config.l1.write.write_back);
    assert!(!config.l1.write.write_allocate);
    // Unspecified block size falls back to 64.
    assert_eq!(config.l1.block_size, 64);
}

// ──────────────────────────────────────────────────────────
// Policy validation
// ──────────────────────────────────────────────────────────

/// A well-formed policy validates.
#[test]
fn valid_policy_accepted() {
    CachePolicy::new(256, 64, 2, 1, 10).validate().unwrap();
}

/// Cache size must be a positive power of two.
#[test]
fn rejects_non_power_of_two_cache_size() {
    assert!(CachePolicy::new(3000, 64, 1, 1, 1).validate().is_err());
    assert!(CachePolicy::new(0, 64, 1, 1, 1).validate().is_err());
}

/// Block size must be a positive power of two.
#[test]
fn rejects_non_power_of_two_block_size() {
    assert!(CachePolicy::new(4096, 48, 1, 1, 1).validate().is_err());
    assert!(CachePolicy::new(4096, 0, 1, 1, 1).validate().is_err());
}

/// Block size must divide cache size.
#[test]
fn rejects_block_larger_than_cache() {
    assert!(CachePolicy::new(64, 128, 1, 1, 1).validate().is_err());
}

/// The stored block count must equal `cache_size / block_size`.
#[test]
fn rejects_inconsistent_block_num() {
    let mut policy = CachePolicy::new(256, 64, 2, 1, 1);
    policy.block_num = 3;
    assert!(policy.validate().is_err());
}

/// Associativity must divide the block count.
#[test]
fn rejects_associativity_not_dividing_blocks() {
    assert!(CachePolicy::new(256, 64, 3, 1, 1).validate().is_err());
    assert!(CachePolicy::new(256, 64, 0, 1, 1).validate().is_err());
}

/// Sets = block count / associativity on a validated policy.
#[test]
fn num_sets_derivation() {
    let policy = CachePolicy::new(16 * 1024, 64, 1, 1, 1);
    assert_eq!(policy.num_sets(), 256);
    let policy = CachePolicy::new(128 * 1024, 64, 8, 8, 8);
    assert_eq!(policy.num_sets(), 256);
}

/// The default write policy is write-back + write-allocate.
#[test]
fn write_policy_default() {
    let write = WritePolicy::default();
    assert!(write.write_back);
    assert!(write.write_allocate);
}
