//! Simulation driver: owns the hierarchy, the memory, and the prefetch
//! controller side-by-side.
//!
//! Keeping the three as siblings avoids any back-reference from the
//! memory to the top cache: the prefetch path runs entirely through the
//! driver, with the controller proposing candidate addresses and the
//! driver issuing the ones not already resident into the top level.

use std::io::BufRead;

use crate::cache::{AccessKind, Hierarchy};
use crate::common::error::SimError;
use crate::config::SimConfig;
use crate::mem::PagedMemory;
use crate::prefetch::StrideController;
use crate::sim::trace::{TraceEvent, TraceOp, TraceReader};

/// Top-level simulation driver.
pub struct Driver {
    /// Cache hierarchy, top first.
    pub hierarchy: Hierarchy,
    /// Backing memory of last resort.
    pub memory: PagedMemory,
    /// Stride prefetch controller feeding the top level.
    pub prefetcher: StrideController,
}

impl Driver {
    /// Builds a driver for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any enabled level's policy is
    /// invalid or no level is enabled.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        Ok(Self {
            hierarchy: Hierarchy::from_config(config)?,
            memory: PagedMemory::new(),
            prefetcher: StrideController::new(),
        })
    }

    /// Applies one trace event: the demand access, then the prefetch
    /// controller update and any prefetches it proposes.
    pub fn apply(&mut self, event: TraceEvent) {
        if !self.memory.page_exists(event.addr) {
            self.memory.add_page(event.addr);
        }

        match event.op {
            TraceOp::Read => {
                self.hierarchy
                    .read(&mut self.memory, event.addr, None, AccessKind::Demand);
            }
            TraceOp::Write => {
                // The trace carries no data; stores write zero.
                self.hierarchy.write(&mut self.memory, event.addr, 0, None);
            }
        }

        for target in self.prefetcher.observe(event.addr) {
            self.issue_prefetch(target);
        }
    }

    /// Issues one prefetch read into the top level, unless the target is
    /// already resident there.
    fn issue_prefetch(&mut self, target: u32) {
        if self.hierarchy.top().in_cache(target) {
            return;
        }
        log::debug!("prefetch {:#010x}", target);
        if !self.memory.page_exists(target) {
            self.memory.add_page(target);
        }
        self.hierarchy
            .read(&mut self.memory, target, None, AccessKind::Prefetch);
    }

    /// Streams a whole trace through the simulator.
    ///
    /// # Errors
    ///
    /// Returns the first I/O or parse error; events before it have
    /// already been applied.
    pub fn run<R: BufRead>(&mut self, source: R) -> Result<(), SimError> {
        for event in TraceReader::new(source) {
            self.apply(event?);
        }
        Ok(())
    }

    /// Prints the top-level header and the recursive statistics report.
    pub fn print_statistics(&self) {
        println!("L1 Cache:");
        self.hierarchy.print_statistics();
    }
}
