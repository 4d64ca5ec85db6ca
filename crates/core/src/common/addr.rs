//! Address layout for one cache level.
//!
//! A 32-bit address is partitioned per level into three fields: the byte
//! `offset` within a block (low bits), the `set` index (middle bits), and
//! the `tag` (remaining high bits). Different levels of the hierarchy may
//! partition the same address differently, so the layout is derived from
//! each level's policy rather than shared.
//!
//! All functions here are pure bit arithmetic; the policy validation in
//! [`crate::config::CachePolicy`] guarantees the widths are well-formed
//! (both block size and set count are powers of two).

use crate::config::CachePolicy;

/// Bit-field layout of an address for one cache level.
///
/// Derived once from a validated [`CachePolicy`] and then used for every
/// lookup, fill, and writeback performed by that level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    /// Number of low-order bits addressing a byte within a block.
    offset_bits: u32,
    /// Number of bits addressing a set.
    set_bits: u32,
    /// Block size in bytes (`1 << offset_bits`).
    block_size: u32,
}

impl AddressLayout {
    /// Derives the layout from a cache policy.
    ///
    /// The policy must already be validated: `block_size` and the set count
    /// (`block_num / associativity`) are positive powers of two.
    pub fn new(policy: &CachePolicy) -> Self {
        let sets = policy.block_num / policy.associativity;
        Self {
            offset_bits: policy.block_size.trailing_zeros(),
            set_bits: sets.trailing_zeros(),
            block_size: policy.block_size,
        }
    }

    /// Extracts the byte offset within a block.
    #[inline(always)]
    pub fn offset(&self, addr: u32) -> u32 {
        addr & (self.block_size - 1)
    }

    /// Extracts the set index.
    #[inline(always)]
    pub fn set(&self, addr: u32) -> u32 {
        let mask = (1u64 << self.set_bits) - 1;
        ((u64::from(addr) >> self.offset_bits) & mask) as u32
    }

    /// Extracts the tag.
    #[inline(always)]
    pub fn tag(&self, addr: u32) -> u32 {
        (u64::from(addr) >> (self.offset_bits + self.set_bits)) as u32
    }

    /// Returns the block-aligned base address containing `addr`.
    #[inline(always)]
    pub fn block_base(&self, addr: u32) -> u32 {
        addr & !(self.block_size - 1)
    }

    /// Reconstructs the base address of the block identified by `tag` and
    /// its owning set index.
    #[inline(always)]
    pub fn block_addr(&self, tag: u32, set: u32) -> u32 {
        ((u64::from(tag) << (self.offset_bits + self.set_bits)) as u32) | (set << self.offset_bits)
    }

    /// Block size in bytes.
    #[inline(always)]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }
}
