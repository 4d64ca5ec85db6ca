//! Adaptive stride prefetch controller.
//!
//! The controller observes the address of every demand access (it does not
//! distinguish reads from writes) and tracks the stride between successive
//! addresses. Three consecutive matching strides arm it; while armed, each
//! further match proposes more prefetch targets and more than three
//! consecutive violations disarm it back into training.
//!
//! The controller holds nothing but five scalars of state. It proposes
//! candidate addresses; the driver decides which are actually issued
//! (skipping those already resident in the top level) and routes them into
//! the hierarchy as prefetch reads.

/// Matching strides required to arm the controller.
const TRAIN_THRESHOLD: u32 = 3;

/// Consecutive stride violations tolerated while armed.
const MISS_TOLERANCE: u32 = 3;

/// Targets proposed when the controller arms.
const BURST_ON_ARM: i64 = 3;

/// Targets proposed per matching access while armed.
const BURST_ACTIVE: i64 = 2;

/// Stride-detection state machine.
#[derive(Debug, Default)]
pub struct StrideController {
    /// Address of the previous observed access.
    last_addr: u32,
    /// Stride between the two most recent observations.
    stride: i64,
    /// Consecutive observations matching `stride`.
    same_count: u32,
    /// Consecutive violations observed while armed.
    miss_count: u32,
    /// Armed state: proposing prefetches.
    active: bool,
}

impl StrideController {
    /// Creates a controller in training mode with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while the controller is armed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The currently tracked stride.
    #[inline]
    pub fn stride(&self) -> i64 {
        self.stride
    }

    /// Observes one demand access and returns the prefetch candidates it
    /// proposes.
    ///
    /// Training mode counts consecutive matching strides and arms after
    /// the third, proposing three stride-ahead targets. While armed, each
    /// matching access proposes two targets and resets the violation
    /// count; a violation increments it, and more than three in a row
    /// disarm the controller with the violating stride as the new
    /// training candidate.
    ///
    /// Candidate arithmetic wraps modulo 2^32, matching the 32-bit
    /// address space.
    pub fn observe(&mut self, addr: u32) -> Vec<u32> {
        let stride = i64::from(addr) - i64::from(self.last_addr);
        self.last_addr = addr;

        let mut targets = Vec::new();

        if !self.active {
            if stride == self.stride {
                self.same_count += 1;
            } else {
                self.stride = stride;
                self.same_count = 1;
            }

            if self.same_count >= TRAIN_THRESHOLD {
                self.active = true;
                self.miss_count = 0;
                for k in 1..=BURST_ON_ARM {
                    targets.push(project(addr, self.stride, k));
                }
            }
        } else if stride == self.stride {
            self.miss_count = 0;
            for k in 1..=BURST_ACTIVE {
                targets.push(project(addr, self.stride, k));
            }
        } else {
            self.miss_count += 1;
            if self.miss_count > MISS_TOLERANCE {
                self.active = false;
                self.stride = stride;
                self.same_count = 1;
            }
        }

        targets
    }
}

/// Computes `addr + k * stride` truncated to the 32-bit address space.
#[inline]
fn project(addr: u32, stride: i64, k: i64) -> u32 {
    (i64::from(addr) + stride * k) as u32
}
