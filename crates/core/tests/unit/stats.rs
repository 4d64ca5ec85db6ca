//! Statistics Report Tests.
//!
//! Verifies the fixed-format statistics block rendered for each cache
//! level at the end of a run.

use cachesim_core::stats::CacheStats;

/// The statistics block renders in the exact report format.
#[test]
fn statistics_block_format() {
    let stats = CacheStats {
        num_read: 10,
        num_write: 3,
        num_hit: 8,
        num_miss: 5,
        total_cycles: 642,
    };
    let rendered = stats.to_string();
    assert_eq!(
        rendered,
        "-------- STATISTICS ----------\n\
         Num Read: 10\n\
         Num Write: 3\n\
         Num Hit: 8\n\
         Num Miss: 5\n\
         Total Cycles: 642"
    );
}

/// A fresh counter set is all zeroes.
#[test]
fn new_stats_zeroed() {
    let stats = CacheStats::new();
    assert_eq!(stats.num_read, 0);
    assert_eq!(stats.num_write, 0);
    assert_eq!(stats.num_hit, 0);
    assert_eq!(stats.num_miss, 0);
    assert_eq!(stats.total_cycles, 0);
}
