//! 24-bit PFCP sequence number allocation.

use std::sync::atomic::{AtomicU32, Ordering};

const SEQUENCE_MASK: u32 = 0x00FF_FFFF;

/// Monotonically increasing 24-bit counter, safe for concurrent senders.
///
/// A fresh generator yields 1, 2, ... 0xFFFFFF, 0, 1, ... The underlying
/// counter is 32-bit and 2^32 is a multiple of 2^24, so the masked sequence
/// stays continuous across the full counter wrap as well.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    counter: AtomicU32,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        SequenceGenerator {
            counter: AtomicU32::new(0),
        }
    }

    /// Allocates the next sequence number.
    pub fn next(&self) -> u32 {
        self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1) & SEQUENCE_MASK
    }
}
