//! bounded transmit queue shared by the interrupts and the main loop
//!
use core::convert::TryFrom;

use heapless::Deque;
use void::Void;

/// bytes waiting for the usart
pub const OUTPUT_QUEUE_SIZE: usize = 256;

/// Interrupt handlers format into this queue instead of waiting on the
/// usart, the main loop moves the bytes out one at a time. A write that
/// does not fit is dropped whole and its bytes are counted, so a record
/// written in one piece never reaches the host truncated.
pub struct OutputQueue {
    bytes: Deque<u8, OUTPUT_QUEUE_SIZE>,
    dropped: u16,
}

impl OutputQueue {
    pub const fn new() -> OutputQueue {
        OutputQueue {
            bytes: Deque::new(),
            dropped: 0,
        }
    }

    pub fn pop(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn free(&self) -> usize {
        OUTPUT_QUEUE_SIZE - self.len()
    }

    /// bytes lost since the last call
    pub fn take_dropped(&mut self) -> u16 {
        core::mem::replace(&mut self.dropped, 0)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Default for OutputQueue {
    fn default() -> Self {
        OutputQueue::new()
    }
}

impl ufmt::uWrite for OutputQueue {
    type Error = Void;

    fn write_str(&mut self, s: &str) -> Result<(), Void> {
        if s.len() > self.free() {
            let lost = u16::try_from(s.len()).unwrap_or(u16::MAX);
            self.dropped = self.dropped.saturating_add(lost);
            return Ok(());
        }
        for &b in s.as_bytes() {
            // room was checked above
            let _ = self.bytes.push_back(b);
        }
        Ok(())
    }
}
