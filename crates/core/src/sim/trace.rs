//! Trace parsing.
//!
//! A trace is a whitespace-separated stream of records, each an operation
//! character followed by a 32-bit hexadecimal address:
//!
//! ```text
//! r 10
//! w 1f00
//! r 0x2000
//! ```
//!
//! `r` is a read, `w` is a write; any other operation token is fatal. The
//! `0x` prefix on addresses is accepted but not required. Records may be
//! split across lines arbitrarily; only token order matters.

use std::io::BufRead;

use crate::common::error::SimError;

/// Trace operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOp {
    /// Byte read.
    Read,
    /// Byte write.
    Write,
}

/// One trace record: an operation at a byte address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    /// Operation kind.
    pub op: TraceOp,
    /// 32-bit byte address.
    pub addr: u32,
}

/// Streaming reader producing [`TraceEvent`]s from any buffered source.
///
/// Tokens are consumed two at a time (operation, then address); an
/// operation token at end of input with no address is a malformed trace.
pub struct TraceReader<R> {
    source: R,
    tokens: Vec<String>,
    next: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(source: R) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            next: 0,
        }
    }

    /// Pulls the next whitespace-separated token, refilling from the
    /// source a line at a time.
    fn next_token(&mut self) -> Result<Option<String>, SimError> {
        loop {
            if self.next < self.tokens.len() {
                let token = self.tokens[self.next].clone();
                self.next += 1;
                return Ok(Some(token));
            }

            let mut line = String::new();
            if self.source.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.tokens = line.split_whitespace().map(str::to_owned).collect();
            self.next = 0;
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        let op_token = match self.next_token() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(err) => return Some(Err(err)),
        };

        let op = match op_token.as_str() {
            "r" => TraceOp::Read,
            "w" => TraceOp::Write,
            other => {
                return Some(Err(SimError::BadTrace(format!(
                    "unknown operation '{}' (expected 'r' or 'w')",
                    other
                ))))
            }
        };

        let addr_token = match self.next_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                return Some(Err(SimError::BadTrace(format!(
                    "operation '{}' at end of trace has no address",
                    op_token
                ))))
            }
            Err(err) => return Some(Err(err)),
        };

        match parse_addr(&addr_token) {
            Ok(addr) => Some(Ok(TraceEvent { op, addr })),
            Err(err) => Some(Err(err)),
        }
    }
}

/// Parses a hexadecimal address token, with or without a `0x` prefix.
fn parse_addr(token: &str) -> Result<u32, SimError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16)
        .map_err(|_| SimError::BadTrace(format!("bad address '{}'", token)))
}
