//! Simulation front matter: trace input and the event loop.
//!
//! This module wires the pieces together:
//! 1. **Trace:** Parsing `<op> <addr>` records from a trace stream.
//! 2. **Driver:** The event loop owning the hierarchy, memory, and
//!    prefetch controller side-by-side.

/// Trace event parsing.
pub mod trace;

/// Simulation driver.
pub mod driver;

pub use self::driver::Driver;
pub use self::trace::{TraceEvent, TraceOp, TraceReader};
