//! Hardware prefetching.
//!
//! This module contains the adaptive stride controller that watches the
//! demand address stream and proposes speculative fills for the top level
//! of the hierarchy.

/// Adaptive next-line/stride prefetch controller.
pub mod stride;

pub use self::stride::StrideController;
