//! Trace Parsing Tests.
//!
//! Verifies the `<op> <addr>` record format: reads and writes, hex
//! addresses with and without the `0x` prefix, records split across
//! lines, and the fatal malformed-record cases.

use std::io::{BufReader, Cursor};

use cachesim_core::common::error::SimError;
use cachesim_core::sim::trace::{TraceEvent, TraceOp, TraceReader};

/// Collects all events, panicking on the first parse error.
fn parse(input: &str) -> Vec<TraceEvent> {
    TraceReader::new(Cursor::new(input))
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Basic reads and writes parse in order.
#[test]
fn parses_reads_and_writes() {
    let events = parse("r 10\nw 1f00\nr ff\n");
    assert_eq!(
        events,
        vec![
            TraceEvent {
                op: TraceOp::Read,
                addr: 0x10
            },
            TraceEvent {
                op: TraceOp::Write,
                addr: 0x1F00
            },
            TraceEvent {
                op: TraceOp::Read,
                addr: 0xFF
            },
        ]
    );
}

/// Addresses are hexadecimal; the `0x` prefix is optional.
#[test]
fn accepts_optional_hex_prefix() {
    let events = parse("r 0x40 w 0X80");
    assert_eq!(events[0].addr, 0x40);
    assert_eq!(events[1].addr, 0x80);
}

/// Only whitespace separates tokens: records may share a line or span
/// lines.
#[test]
fn records_split_across_lines() {
    let events = parse("r\n10 w 20\n\n  r\t30");
    assert_eq!(events.len(), 3);
    assert_eq!(events[1], TraceEvent {
        op: TraceOp::Write,
        addr: 0x20
    });
}

/// An empty trace produces no events and no error.
#[test]
fn empty_trace_is_fine() {
    assert!(parse("").is_empty());
    assert!(parse("   \n\n").is_empty());
}

/// The full 32-bit address range is accepted.
#[test]
fn full_address_range() {
    let events = parse("r ffffffff w 0");
    assert_eq!(events[0].addr, u32::MAX);
    assert_eq!(events[1].addr, 0);
}

/// Any operation other than `r` or `w` is fatal.
#[test]
fn unknown_op_is_fatal() {
    let mut reader = TraceReader::new(Cursor::new("x 10"));
    match reader.next() {
        Some(Err(SimError::BadTrace(msg))) => assert!(msg.contains("'x'")),
        other => panic!("expected BadTrace, got {:?}", other.map(|r| r.is_ok())),
    }
}

/// A non-hexadecimal address is fatal.
#[test]
fn bad_address_is_fatal() {
    let mut reader = TraceReader::new(Cursor::new("r zz"));
    assert!(matches!(
        reader.next(),
        Some(Err(SimError::BadTrace(_)))
    ));
}

/// An operation with no address at end of input is fatal.
#[test]
fn dangling_op_is_fatal() {
    let mut reader = TraceReader::new(Cursor::new("r 10 w"));
    assert!(reader.next().unwrap().is_ok());
    assert!(matches!(
        reader.next(),
        Some(Err(SimError::BadTrace(_)))
    ));
}

/// Events keep parsing correctly from a real file on disk.
#[test]
fn parses_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "r 0\nw 40\nr 80\n").unwrap();

    let opened = std::fs::File::open(file.path()).unwrap();
    let events: Vec<_> = TraceReader::new(BufReader::new(opened))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].op, TraceOp::Write);
    assert_eq!(events[2].addr, 0x80);
}
