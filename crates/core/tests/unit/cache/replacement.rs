//! Victim Selection Tests.
//!
//! Verifies the LRU choice over a set's associativity window: free slots
//! first, then the smallest reference stamp, ties to the lowest index.

use cachesim_core::cache::block::Block;
use cachesim_core::cache::replacement::choose_victim;

/// Builds a valid block with a given reference stamp.
fn stamped(id: u32, last_reference: u64) -> Block {
    let mut block = Block::filled(0, id, 64);
    block.last_reference = last_reference;
    block
}

/// An invalid slot is always preferred over evicting a valid block.
#[test]
fn prefers_first_invalid_slot() {
    let window = [stamped(0, 10), Block::empty(0, 64), Block::empty(0, 64)];
    assert_eq!(choose_victim(&window), 1);
}

/// With every slot valid, the smallest reference stamp loses.
#[test]
fn evicts_least_recently_used() {
    let window = [stamped(0, 30), stamped(0, 10), stamped(0, 20)];
    assert_eq!(choose_victim(&window), 1);
}

/// Equal stamps break to the lowest index, so the choice is deterministic.
#[test]
fn ties_break_to_lowest_index() {
    let window = [stamped(0, 5), stamped(0, 5), stamped(0, 5)];
    assert_eq!(choose_victim(&window), 0);
}

/// A direct-mapped window always selects its only slot.
#[test]
fn single_way_window() {
    assert_eq!(choose_victim(&[stamped(0, 99)]), 0);
    assert_eq!(choose_victim(&[Block::empty(0, 64)]), 0);
}
