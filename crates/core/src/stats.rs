//! Per-level statistics collection and reporting.
//!
//! This module tracks access counters for each cache level and renders
//! the terminal report. It provides:
//! 1. **Counters:** Demand reads/writes, hits, misses, and accumulated
//!    cycles.
//! 2. **Reporting:** The fixed-format statistics block printed per level
//!    at the end of a run, with levels separated by a `LOWER CACHE`
//!    divider.
//!
//! Reads and writes count demand accesses only; prefetch reads are
//! invisible to `num_read`. Hits count for every access. Misses and the
//! miss-latency charge are skipped for prefetch reads.

use std::fmt;

/// Access counters of one cache level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Demand read accesses.
    pub num_read: u32,
    /// Demand write accesses.
    pub num_write: u32,
    /// Hits, demand and prefetch alike.
    pub num_hit: u32,
    /// Demand misses.
    pub num_miss: u32,
    /// Cycles accumulated by this level.
    pub total_cycles: u64,
}

impl CacheStats {
    /// Creates a zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for CacheStats {
    /// Renders the statistics block exactly as the report expects it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------- STATISTICS ----------")?;
        writeln!(f, "Num Read: {}", self.num_read)?;
        writeln!(f, "Num Write: {}", self.num_write)?;
        writeln!(f, "Num Hit: {}", self.num_hit)?;
        writeln!(f, "Num Miss: {}", self.num_miss)?;
        write!(f, "Total Cycles: {}", self.total_cycles)
    }
}
