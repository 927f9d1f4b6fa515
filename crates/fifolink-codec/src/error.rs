use crate::codec::Width;

/// Errors raised by the codec, the interleaver and configuration checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A value does not fit in the configured element width.
    #[error("value {value} out of range for {width}-byte element")]
    ValueOutOfRange { value: u64, width: Width },

    /// The byte stream does not split into whole elements.
    #[error("byte stream of {length} bytes is not a multiple of width {width}")]
    TruncatedStream { length: usize, width: Width },

    /// Channels handed to the interleaver differ in length.
    #[error("channel {channel} has {actual} elements, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    /// The transmit and receive byte granularities are not an integer ratio.
    #[error("transmit frame of {tx_bytes} bytes per round is not a multiple of receive frame of {rx_bytes} bytes")]
    IncompatibleWidthRatio { tx_bytes: usize, rx_bytes: usize },

    /// Element width outside 1..=4.
    #[error("invalid element width {0} (must be 1-4)")]
    InvalidWidth(u8),

    /// A channel count of zero.
    #[error("invalid channel count {0} (must be at least 1)")]
    InvalidChannelCount(usize),

    /// A FIFO depth of zero.
    #[error("invalid depth {0} (must be at least 1)")]
    InvalidDepth(usize),

    /// Channel counts and depth are too large to size one cycle.
    #[error("layout of {channels_tx} tx / {channels_rx} rx channels at depth {depth} overflows")]
    LayoutOverflow {
        channels_tx: usize,
        channels_rx: usize,
        depth: usize,
    },

    /// A transmit channel set does not match the configured channel count.
    #[error("got {actual} channels, configured for {expected}")]
    ChannelCountMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
