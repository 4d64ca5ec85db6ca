//! Cache block storage slot.
//!
//! One `Block` is one way of one set: a valid/dirty pair, the tag that
//! identifies which memory block occupies the slot, the immutable index of
//! the owning set, an LRU timestamp, and the block's data bytes.

/// One storage slot of a cache level.
///
/// Blocks are created once at cache initialization and then overwritten in
/// place by fills; they are never deallocated individually. The `id` field
/// records the owning set and never changes after construction. A lookup
/// that observes a slot whose `id` disagrees with its position has found
/// corrupted state and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Slot holds a live block.
    pub valid: bool,
    /// Block bytes differ from the lower level (dirty).
    pub modified: bool,
    /// Tag identifying the resident memory block.
    pub tag: u32,
    /// Owning set index; immutable for the lifetime of the cache.
    pub id: u32,
    /// Block size in bytes.
    pub size: u32,
    /// Value of the level's reference counter at the last access.
    pub last_reference: u64,
    /// Block data, `size` bytes.
    pub data: Vec<u8>,
}

impl Block {
    /// Creates the invalid slot initially occupying set `id`.
    pub fn empty(id: u32, size: u32) -> Self {
        Self {
            valid: false,
            modified: false,
            tag: 0,
            id,
            size,
            last_reference: 0,
            data: vec![0; size as usize],
        }
    }

    /// Creates a fresh clean block for a fill of set `id` with tag `tag`.
    ///
    /// The data buffer starts zeroed; the fill populates it before the
    /// block is installed.
    pub fn filled(tag: u32, id: u32, size: u32) -> Self {
        Self {
            valid: true,
            modified: false,
            tag,
            id,
            size,
            last_reference: 0,
            data: vec![0; size as usize],
        }
    }
}
