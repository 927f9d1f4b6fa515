use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::error::Result;
use crate::traits::Transport;

/// In-memory wire that hands back whatever was written to it.
///
/// Models a device whose receive FIFO is wired straight to its transmit
/// FIFO. An optional capacity caps the bytes held in flight; writes past the
/// cap are dropped, which is how a device with a shallow FIFO loses data.
#[derive(Debug, Default)]
pub struct Loopback {
    pending: BytesMut,
    capacity: Option<usize>,
    dropped: usize,
}

impl Loopback {
    /// Create an unbounded loopback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loopback that holds at most `capacity` bytes in flight.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Queue bytes as if the device had sent them unprompted.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Bytes written and not yet read back.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Bytes discarded because the capacity was exhausted.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Transport for Loopback {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let room = match self.capacity {
            Some(cap) => cap.saturating_sub(self.pending.len()),
            None => bytes.len(),
        };
        let accepted = bytes.len().min(room);
        self.pending.extend_from_slice(&bytes[..accepted]);

        let dropped = bytes.len() - accepted;
        if dropped > 0 {
            self.dropped += dropped;
            debug!(accepted, dropped, "loopback capacity exhausted");
        }
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> Result<Bytes> {
        let take = max_len.min(self.pending.len());
        Ok(self.pending.split_to(take).freeze())
    }
}
