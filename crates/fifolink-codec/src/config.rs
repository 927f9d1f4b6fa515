use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{Endianness, Width};
use crate::error::{CodecError, Result};

/// Default FIFO depth per channel.
pub const DEFAULT_DEPTH: usize = 256;

/// Default element width in both directions.
pub const DEFAULT_WIDTH: u8 = 4;

/// Link parameters as written by a user or a config file.
///
/// Widths are plain integers here so that a bad value surfaces as
/// [`CodecError::InvalidWidth`] from [`LinkConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// Bytes per transmitted element (1-4).
    pub width_tx: u8,
    /// Bytes per received element (1-4).
    pub width_rx: u8,
    /// Parallel channels sent to the device.
    pub channels_tx: usize,
    /// Parallel channels returned by the device.
    pub channels_rx: usize,
    /// Samples queued per channel in one cycle.
    pub depth: usize,
    /// Byte order used in both directions.
    pub endianness: Endianness,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            width_tx: DEFAULT_WIDTH,
            width_rx: DEFAULT_WIDTH,
            channels_tx: 1,
            channels_rx: 1,
            depth: DEFAULT_DEPTH,
            endianness: Endianness::Big,
        }
    }
}

impl LinkConfig {
    /// Check the configuration and derive the cycle layout.
    pub fn validate(&self) -> Result<LinkLayout> {
        let width_tx = Width::new(self.width_tx)?;
        let width_rx = Width::new(self.width_rx)?;

        if self.channels_tx == 0 {
            return Err(CodecError::InvalidChannelCount(self.channels_tx));
        }
        if self.channels_rx == 0 {
            return Err(CodecError::InvalidChannelCount(self.channels_rx));
        }
        if self.depth == 0 {
            return Err(CodecError::InvalidDepth(self.depth));
        }

        let overflow = CodecError::LayoutOverflow {
            channels_tx: self.channels_tx,
            channels_rx: self.channels_rx,
            depth: self.depth,
        };
        let tx_bytes = width_tx
            .bytes()
            .checked_mul(self.channels_tx)
            .ok_or_else(|| overflow.clone())?;
        let rx_bytes = width_rx
            .bytes()
            .checked_mul(self.channels_rx)
            .ok_or_else(|| overflow.clone())?;
        if tx_bytes % rx_bytes != 0 {
            return Err(CodecError::IncompatibleWidthRatio { tx_bytes, rx_bytes });
        }
        let width_ratio = tx_bytes / rx_bytes;
        let receive_channels = self
            .channels_rx
            .checked_mul(width_ratio)
            .ok_or_else(|| overflow.clone())?;
        let read_len = self
            .depth
            .checked_mul(tx_bytes.max(rx_bytes))
            .ok_or(overflow)?;

        let layout = LinkLayout {
            width_tx,
            width_rx,
            channels_tx: self.channels_tx,
            channels_rx: self.channels_rx,
            depth: self.depth,
            endianness: self.endianness,
            width_ratio,
            receive_channels,
            read_len,
        };
        debug!(
            width_ratio,
            receive_channels = layout.receive_channels,
            read_len = layout.read_len,
            "validated link configuration"
        );
        Ok(layout)
    }
}

/// A validated configuration plus the quantities derived from it.
///
/// Computed once; every cycle on a link reuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkLayout {
    pub width_tx: Width,
    pub width_rx: Width,
    pub channels_tx: usize,
    pub channels_rx: usize,
    pub depth: usize,
    pub endianness: Endianness,
    /// `(width_tx * channels_tx) / (width_rx * channels_rx)`, always >= 1.
    pub width_ratio: usize,
    /// Channel count used to reshape received data.
    pub receive_channels: usize,
    /// Upper bound handed to `Transport::read` for one cycle.
    pub read_len: usize,
}

impl LinkLayout {
    /// Bytes written for one full transmit cycle. Never exceeds `read_len`.
    pub fn transmit_len(&self) -> usize {
        self.depth * self.channels_tx * self.width_tx.bytes()
    }

    /// The configuration this layout was derived from.
    pub fn config(&self) -> LinkConfig {
        LinkConfig {
            width_tx: self.width_tx.into(),
            width_rx: self.width_rx.into(),
            channels_tx: self.channels_tx,
            channels_rx: self.channels_rx,
            depth: self.depth,
            endianness: self.endianness,
        }
    }
}
