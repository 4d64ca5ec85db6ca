//! Trace-driven cache hierarchy simulator library.
//!
//! This crate implements a multi-level set-associative cache simulator
//! with the following:
//! 1. **Cache engine:** Tag/set/offset decomposition, set-associative
//!    block storage, LRU replacement over a monotonic reference counter,
//!    and write-back/write-allocate policy handling.
//! 2. **Hierarchy:** Recursive miss and writeback propagation through an
//!    ordered chain of levels backed by a paged memory of last resort.
//! 3. **Prefetching:** An adaptive stride controller issuing speculative
//!    fills into the top level.
//! 4. **Simulation:** Trace parsing, the event-loop driver, and per-level
//!    statistics reporting.

/// Cache levels, block storage, replacement, and the hierarchy chain.
pub mod cache;
/// Common types (address layout, errors).
pub mod common;
/// Simulator configuration (defaults, policies, hierarchy config).
pub mod config;
/// Paged backing memory.
pub mod mem;
/// Stride prefetch controller.
pub mod prefetch;
/// Trace parsing and the simulation driver.
pub mod sim;
/// Per-level statistics.
pub mod stats;

/// Root configuration type; use `SimConfig::default()` for the stock
/// three-level hierarchy or deserialize a JSON override.
pub use crate::config::SimConfig;
/// The simulation driver; owns hierarchy, memory, and prefetcher.
pub use crate::sim::Driver;
