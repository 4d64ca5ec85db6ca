//! Set-associative cache level and the hierarchy composed from them.
//!
//! This module implements the cache engine. It provides:
//! 1. **CacheLevel:** One level of the hierarchy: block storage organized
//!    as sets x ways, hit/miss accounting, byte reads and writes under
//!    configurable write policies, and block fill from the level below.
//! 2. **Recursive descent:** Misses and writebacks propagate through the
//!    chain of levels; the deepest level reads and writes the paged memory
//!    directly.
//! 3. **Hierarchy:** The ordered composition the driver addresses, plus
//!    the recursive statistics and info reports.
//!
//! The chain is expressed over `&mut [CacheLevel]` slices: a level is the
//! head of its slice and its lower neighbors are the tail, so the deepest
//! level is simply the one with an empty tail. No trait objects are
//! involved; there is exactly one kind of cache level.

/// Cache block storage slot.
pub mod block;

/// LRU victim selection.
pub mod replacement;

use self::block::Block;
use crate::common::addr::AddressLayout;
use crate::common::error::SimError;
use crate::config::{defaults, CachePolicy, SimConfig, WritePolicy};
use crate::mem::PagedMemory;
use crate::stats::CacheStats;

/// Whether an access is a demand access or a speculative prefetch.
///
/// Prefetch reads are invisible to the demand counters: they never bump
/// `num_read`, and on a miss they bump neither `num_miss` nor the
/// miss-latency cycle charge. Hits and the reference counter are updated
/// for every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// A demand access from the trace.
    Demand,
    /// A speculative read issued by the prefetch controller.
    Prefetch,
}

impl AccessKind {
    /// Returns `true` for demand accesses.
    #[inline]
    pub fn is_demand(self) -> bool {
        matches!(self, AccessKind::Demand)
    }
}

/// One level of the cache hierarchy.
pub struct CacheLevel {
    policy: CachePolicy,
    layout: AddressLayout,
    write: WritePolicy,
    full_block_fill: bool,
    reference_counter: u64,
    blocks: Vec<Block>,
    /// Access counters of this level.
    pub stats: CacheStats,
}

impl CacheLevel {
    /// Creates a cache level after validating its policy.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidPolicy`] if the policy violates the
    /// power-of-two or divisibility constraints.
    pub fn new(
        policy: CachePolicy,
        write: WritePolicy,
        full_block_fill: bool,
    ) -> Result<Self, SimError> {
        policy.validate()?;

        let blocks = (0..policy.block_num)
            .map(|i| Block::empty(i / policy.associativity, policy.block_size))
            .collect();

        Ok(Self {
            layout: AddressLayout::new(&policy),
            policy,
            write,
            full_block_fill,
            reference_counter: 0,
            blocks,
            stats: CacheStats::new(),
        })
    }

    /// Returns `true` if `addr` is resident in this level.
    ///
    /// Pure query: no counter is touched.
    pub fn in_cache(&self, addr: u32) -> bool {
        self.find_slot(addr).is_some()
    }

    /// This level's policy descriptor.
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// This level's address layout.
    pub fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// This level's write-policy flags.
    pub fn write_policy(&self) -> &WritePolicy {
        &self.write
    }

    /// The block storage, sets x ways in slot order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Looks up `addr` in its owning set.
    ///
    /// Scans exactly the set's associativity window and returns the first
    /// slot holding a valid block with a matching tag.
    ///
    /// # Panics
    ///
    /// Panics if any visited slot stores a set id inconsistent with its
    /// position; that state is unreachable unless the storage has been
    /// corrupted.
    fn find_slot(&self, addr: u32) -> Option<usize> {
        let tag = self.layout.tag(addr);
        let set = self.layout.set(addr);

        for slot in self.set_range(set) {
            let block = &self.blocks[slot];
            if block.id != set {
                panic!("inconsistent set id in block {}: {} != {}", slot, block.id, set);
            }
            if block.valid && block.tag == tag {
                return Some(slot);
            }
        }
        None
    }

    /// Slot index range of one set's associativity window.
    #[inline]
    fn set_range(&self, set: u32) -> std::ops::Range<usize> {
        let begin = (set * self.policy.associativity) as usize;
        begin..begin + self.policy.associativity as usize
    }

    /// Fills the block containing `addr` from the level below (or from
    /// memory at the deepest level), evicting a victim if the set is full.
    ///
    /// By default only the first byte of the block is actually transferred,
    /// preserving the historical fill behavior; `full_block_fill` enables
    /// the whole-block transfer (see RELEASE_NOTES.md). A valid dirty
    /// victim is written back down the chain before its slot is reused
    /// when write-back is enabled.
    fn fill(
        &mut self,
        lower: &mut [CacheLevel],
        mem: &mut PagedMemory,
        addr: u32,
        mut cycles: Option<&mut u32>,
        kind: AccessKind,
    ) {
        let set = self.layout.set(addr);
        let mut incoming = Block::filled(self.layout.tag(addr), set, self.policy.block_size);

        let base = self.layout.block_base(addr);
        let span = if self.full_block_fill {
            self.policy.block_size
        } else {
            1
        };
        for i in 0..span {
            let byte = if lower.is_empty() {
                if let Some(c) = cycles.as_deref_mut() {
                    *c += defaults::MEMORY_BYTE_LATENCY;
                }
                mem.read_byte(base + i)
            } else {
                read_byte(lower, mem, base + i, cycles.as_deref_mut(), kind)
            };
            incoming.data[i as usize] = byte;
        }

        let range = self.set_range(set);
        let victim = range.start + replacement::choose_victim(&self.blocks[range]);
        log::trace!(
            "fill addr={:#010x} set={} tag={:#x} victim_slot={}",
            addr,
            set,
            incoming.tag,
            victim
        );

        if self.write.write_back && self.blocks[victim].valid && self.blocks[victim].modified {
            let evicted = self.blocks[victim].clone();
            log::debug!(
                "writeback of dirty block tag={:#x} set={} on eviction",
                evicted.tag,
                evicted.id
            );
            self.write_back_block(lower, mem, &evicted);
            self.stats.total_cycles += u64::from(self.policy.miss_latency);
        }

        debug_assert_eq!(incoming.id, self.blocks[victim].id);
        self.blocks[victim] = incoming;
    }

    /// Propagates every byte of `block` to the level below, or to memory
    /// at the deepest level.
    ///
    /// Writebacks are demand writes at the next level regardless of what
    /// kind of access triggered them.
    fn write_back_block(&self, lower: &mut [CacheLevel], mem: &mut PagedMemory, block: &Block) {
        let base = self.layout.block_addr(block.tag, block.id);
        for (i, &byte) in block.data.iter().enumerate() {
            let addr = base.wrapping_add(i as u32);
            if lower.is_empty() {
                mem.write_byte(addr, byte);
            } else {
                write_byte(lower, mem, addr, byte, None);
            }
        }
    }

    /// Prints this level's configuration, and each slot's state when
    /// `verbose` is set.
    pub fn print_info(&self, verbose: bool) {
        println!("---------- Cache Info -----------");
        println!("Cache Size: {} bytes", self.policy.cache_size);
        println!("Block Size: {} bytes", self.policy.block_size);
        println!("Block Num: {}", self.policy.block_num);
        println!("Associativity: {}", self.policy.associativity);
        println!("Hit Latency: {} cycles", self.policy.hit_latency);
        println!("Miss Latency: {} cycles", self.policy.miss_latency);

        if verbose {
            for (slot, block) in self.blocks.iter().enumerate() {
                println!(
                    "Block {}: tag {:#x} id {} {} {} (last ref {})",
                    slot,
                    block.tag,
                    block.id,
                    if block.valid { "valid" } else { "invalid" },
                    if block.modified { "modified" } else { "unmodified" },
                    block.last_reference
                );
            }
        }
    }
}

/// Reads one byte through the cache chain headed by `levels[0]`.
///
/// On a hit the block's byte is returned after `hit_latency` is charged;
/// on a miss the block is filled from below and the read retried. The
/// retry must succeed: a fill that leaves the address absent is a fatal
/// invariant violation.
///
/// When `cycles` is provided, a hit stores `hit_latency` into it and a
/// fill that reaches memory adds the per-byte memory cost.
///
/// # Panics
///
/// Panics if `levels` is empty or if the address is still absent after a
/// fill.
pub fn read_byte(
    levels: &mut [CacheLevel],
    mem: &mut PagedMemory,
    addr: u32,
    mut cycles: Option<&mut u32>,
    kind: AccessKind,
) -> u8 {
    let (level, lower) = levels
        .split_first_mut()
        .expect("cache hierarchy has no levels");

    level.reference_counter += 1;
    if kind.is_demand() {
        level.stats.num_read += 1;
    }

    if let Some(slot) = level.find_slot(addr) {
        level.stats.num_hit += 1;
        level.stats.total_cycles += u64::from(level.policy.hit_latency);
        level.blocks[slot].last_reference = level.reference_counter;
        if let Some(c) = cycles.as_deref_mut() {
            *c = level.policy.hit_latency;
        }
        let offset = level.layout.offset(addr) as usize;
        return level.blocks[slot].data[offset];
    }

    if kind.is_demand() {
        level.stats.num_miss += 1;
        level.stats.total_cycles += u64::from(level.policy.miss_latency);
    }

    level.fill(lower, mem, addr, cycles.as_deref_mut(), kind);

    let slot = level
        .find_slot(addr)
        .unwrap_or_else(|| panic!("address {:#010x} absent after fill", addr));
    level.blocks[slot].last_reference = level.reference_counter;
    let offset = level.layout.offset(addr) as usize;
    level.blocks[slot].data[offset]
}

/// Writes one byte through the cache chain headed by `levels[0]`.
///
/// Writes are always demand accesses. On a hit the block is updated and
/// marked dirty; under write-through the block is immediately propagated
/// down (clearing the dirty bit once the store has completed) at an extra
/// `miss_latency` charge. On a miss, write-allocate fills the block first
/// and then performs the hit-path mutation; write-around forwards the
/// single byte downward without allocating here.
///
/// # Panics
///
/// Panics if `levels` is empty or if a write-allocate fill leaves the
/// address absent.
pub fn write_byte(
    levels: &mut [CacheLevel],
    mem: &mut PagedMemory,
    addr: u32,
    value: u8,
    mut cycles: Option<&mut u32>,
) {
    let (level, lower) = levels
        .split_first_mut()
        .expect("cache hierarchy has no levels");

    level.reference_counter += 1;
    level.stats.num_write += 1;

    if let Some(slot) = level.find_slot(addr) {
        level.stats.num_hit += 1;
        level.stats.total_cycles += u64::from(level.policy.hit_latency);
        let offset = level.layout.offset(addr) as usize;
        level.blocks[slot].modified = true;
        level.blocks[slot].last_reference = level.reference_counter;
        level.blocks[slot].data[offset] = value;

        if !level.write.write_back {
            let stored = level.blocks[slot].clone();
            level.write_back_block(lower, mem, &stored);
            level.blocks[slot].modified = false;
            level.stats.total_cycles += u64::from(level.policy.miss_latency);
        }
        if let Some(c) = cycles {
            *c = level.policy.hit_latency;
        }
        return;
    }

    level.stats.num_miss += 1;
    level.stats.total_cycles += u64::from(level.policy.miss_latency);

    if level.write.write_allocate {
        level.fill(lower, mem, addr, cycles.as_deref_mut(), AccessKind::Demand);
        let slot = level
            .find_slot(addr)
            .unwrap_or_else(|| panic!("address {:#010x} absent after fill", addr));
        let offset = level.layout.offset(addr) as usize;
        level.blocks[slot].modified = true;
        level.blocks[slot].last_reference = level.reference_counter;
        level.blocks[slot].data[offset] = value;
    } else if lower.is_empty() {
        mem.write_byte(addr, value);
    } else {
        write_byte(lower, mem, addr, value, None);
    }
}

/// The ordered chain of cache levels, top first.
///
/// The hierarchy owns its levels; the paged memory of last resort is owned
/// by the caller and threaded through every operation, so each level holds
/// no reference to anything it does not own.
pub struct Hierarchy {
    levels: Vec<CacheLevel>,
}

impl Hierarchy {
    /// Builds a hierarchy from an ordered list of levels, top first.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EmptyHierarchy`] if `levels` is empty.
    pub fn new(levels: Vec<CacheLevel>) -> Result<Self, SimError> {
        if levels.is_empty() {
            return Err(SimError::EmptyHierarchy);
        }
        Ok(Self { levels })
    }

    /// Builds the hierarchy described by a simulation config.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidPolicy`] if any enabled level's policy is
    /// invalid, or [`SimError::EmptyHierarchy`] if no level is enabled.
    pub fn from_config(config: &SimConfig) -> Result<Self, SimError> {
        let levels = config
            .enabled_levels()
            .into_iter()
            .map(|level| CacheLevel::new(level.policy(), level.write, config.full_block_fill))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    /// Reads one byte through the top of the hierarchy.
    pub fn read(
        &mut self,
        mem: &mut PagedMemory,
        addr: u32,
        cycles: Option<&mut u32>,
        kind: AccessKind,
    ) -> u8 {
        read_byte(&mut self.levels, mem, addr, cycles, kind)
    }

    /// Writes one byte through the top of the hierarchy.
    pub fn write(&mut self, mem: &mut PagedMemory, addr: u32, value: u8, cycles: Option<&mut u32>) {
        write_byte(&mut self.levels, mem, addr, value, cycles)
    }

    /// The top-level cache.
    pub fn top(&self) -> &CacheLevel {
        &self.levels[0]
    }

    /// All levels, top first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Prints every level's statistics block, levels separated by the
    /// `LOWER CACHE` divider.
    pub fn print_statistics(&self) {
        for (depth, level) in self.levels.iter().enumerate() {
            if depth > 0 {
                println!("---------- LOWER CACHE ----------");
            }
            println!("{}", level.stats);
        }
    }

    /// Prints every level's configuration info block.
    pub fn print_info(&self, verbose: bool) {
        for level in &self.levels {
            level.print_info(verbose);
        }
    }
}
