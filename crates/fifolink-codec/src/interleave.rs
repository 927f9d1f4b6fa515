//! Round-robin interleaving of parallel channels.
//!
//! For `C` channels of depth `D` the flat form holds channel `c`, depth
//! index `d` at position `d * C + c`:
//! ```text
//! ch0: a0 a1 a2
//! ch1: b0 b1 b2      ->   a0 b0 a1 b1 a2 b2
//! ```

use crate::codec::Element;
use crate::error::{CodecError, Result};

/// Per-channel samples, indexed by channel then depth.
pub type ChannelSet = Vec<Vec<Element>>;

/// Interleave equal-length channels into one flat sequence.
///
/// Every channel must be as long as channel 0. An empty set flattens to an
/// empty sequence.
pub fn flatten<C: AsRef<[Element]>>(channels: &[C]) -> Result<Vec<Element>> {
    let Some(first) = channels.first() else {
        return Ok(Vec::new());
    };
    let depth = first.as_ref().len();

    for (index, channel) in channels.iter().enumerate() {
        let actual = channel.as_ref().len();
        if actual != depth {
            return Err(CodecError::ChannelLengthMismatch {
                channel: index,
                expected: depth,
                actual,
            });
        }
    }

    let mut flat = Vec::with_capacity(depth * channels.len());
    for d in 0..depth {
        flat.extend(channels.iter().map(|channel| channel.as_ref()[d]));
    }
    Ok(flat)
}

/// Split a flat sequence into `channel_count` channels by stride.
///
/// Channel `c` receives `flat[c]`, `flat[c + channel_count]`, and so on.
/// When the length is not a multiple of `channel_count` the last partial
/// round fills channels in index order, so trailing channels come out one
/// element shorter. Receive paths rely on this to surface short reads as
/// data rather than errors.
pub fn reshape(flat: &[Element], channel_count: usize) -> Result<ChannelSet> {
    if channel_count == 0 {
        return Err(CodecError::InvalidChannelCount(channel_count));
    }

    let mut channels: ChannelSet = (0..channel_count)
        .map(|c| Vec::with_capacity(flat.len().saturating_sub(c).div_ceil(channel_count)))
        .collect();
    for (i, &value) in flat.iter().enumerate() {
        channels[i % channel_count].push(value);
    }
    Ok(channels)
}
