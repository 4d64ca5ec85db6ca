//! Simulator error types.
//!
//! This module defines the error taxonomy of the simulator:
//! 1. **Configuration errors:** A cache policy violating the power-of-two
//!    or divisibility constraints, a hierarchy with no levels, or a
//!    configuration file that does not deserialize.
//! 2. **Input errors:** An unreadable trace file or a malformed trace
//!    record.
//!
//! Structural invariant violations (a block whose stored set id disagrees
//! with its slot, or an address still absent after a fill) are programming
//! errors, not recoverable conditions; they are asserted with `panic!` at
//! the point of detection rather than surfaced through this type.

use std::fmt;
use std::io;

/// Errors reported by the simulator core.
#[derive(Debug)]
pub enum SimError {
    /// A cache policy failed validation.
    ///
    /// The associated string names the violated constraint.
    InvalidPolicy(String),

    /// The hierarchy configuration enables no cache level.
    EmptyHierarchy,

    /// A trace record could not be parsed.
    ///
    /// The associated string carries the offending token and what was
    /// expected in its place.
    BadTrace(String),

    /// An I/O failure while reading the trace or a configuration file.
    Io(io::Error),

    /// A configuration file could not be deserialized.
    Config(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidPolicy(reason) => write!(f, "invalid cache policy: {}", reason),
            SimError::EmptyHierarchy => {
                write!(f, "hierarchy configuration enables no cache level")
            }
            SimError::BadTrace(reason) => write!(f, "malformed trace: {}", reason),
            SimError::Io(err) => write!(f, "i/o error: {}", err),
            SimError::Config(err) => write!(f, "bad configuration: {}", err),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(err) => Some(err),
            SimError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SimError {
    fn from(err: io::Error) -> Self {
        SimError::Io(err)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err)
    }
}
