//! LRU victim selection.
//!
//! Replacement is least-recently-used over the level's monotonic reference
//! counter: every access stamps the touched block with the current counter
//! value, so the valid block with the smallest stamp is the coldest.

use super::block::Block;

/// Chooses the victim slot within one set's associativity window.
///
/// Returns the offset of the first invalid slot if the set still has free
/// capacity; otherwise the offset of the valid block with the smallest
/// `last_reference`. Ties break to the lowest offset, which makes the
/// choice deterministic.
pub fn choose_victim(window: &[Block]) -> usize {
    if let Some(free) = window.iter().position(|block| !block.valid) {
        return free;
    }

    let mut victim = 0;
    let mut oldest = u64::MAX;
    for (way, block) in window.iter().enumerate() {
        if block.last_reference < oldest {
            oldest = block.last_reference;
            victim = way;
        }
    }
    victim
}
