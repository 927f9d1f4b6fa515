use bytes::Bytes;
use fifolink_codec::{
    decode, encode, flatten, reshape, ChannelSet, CodecError, Element, LinkConfig, LinkLayout,
};
use fifolink_transport::Transport;
use tracing::{debug, warn};

use crate::error::Result;

/// Outcome of one receive cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    /// Raw bytes returned by the transport.
    pub bytes: Bytes,
    /// Decoded samples split into the receive channel count.
    pub channels: ChannelSet,
}

impl Received {
    /// Whether the transport delivered `expected` bytes.
    pub fn is_complete(&self, expected: usize) -> bool {
        self.bytes.len() == expected
    }
}

/// Outcome of one transmit-then-receive cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Bytes handed to the transport.
    pub transmitted: Bytes,
    /// What came back.
    pub received: Received,
}

/// A configured link to one device.
pub struct Link<T> {
    transport: T,
    layout: LinkLayout,
}

impl<T: Transport> Link<T> {
    /// Validate `config` and wrap `transport`.
    pub fn new(transport: T, config: LinkConfig) -> Result<Self> {
        let layout = config.validate()?;
        Ok(Self::with_layout(transport, layout))
    }

    /// Wrap `transport` with an already validated layout.
    pub fn with_layout(transport: T, layout: LinkLayout) -> Self {
        Self { transport, layout }
    }

    /// The layout every cycle uses.
    pub fn layout(&self) -> &LinkLayout {
        &self.layout
    }

    /// Interleave, encode and write one full transmit cycle.
    ///
    /// `channels` must hold exactly `channels_tx` channels of `depth`
    /// samples. Returns the bytes that were written.
    pub fn transmit<C: AsRef<[Element]>>(&mut self, channels: &[C]) -> Result<Bytes> {
        let layout = &self.layout;
        if channels.len() != layout.channels_tx {
            return Err(CodecError::ChannelCountMismatch {
                expected: layout.channels_tx,
                actual: channels.len(),
            }
            .into());
        }
        if let Some((channel, actual)) = channels
            .iter()
            .map(|c| c.as_ref().len())
            .enumerate()
            .find(|&(_, len)| len != layout.depth)
        {
            return Err(CodecError::ChannelLengthMismatch {
                channel,
                expected: layout.depth,
                actual,
            }
            .into());
        }

        let flat = flatten(channels)?;
        let bytes = encode(&flat, layout.width_tx, layout.endianness)?;
        self.transport.write(&bytes)?;
        debug!(
            elements = flat.len(),
            bytes = bytes.len(),
            "transmitted cycle"
        );
        Ok(bytes)
    }

    /// Read, decode and reshape one receive cycle.
    ///
    /// A short read is not an error as long as it holds whole elements; the
    /// trailing channels simply come out shorter.
    pub fn receive(&mut self) -> Result<Received> {
        let layout = &self.layout;
        let bytes = self.transport.read(layout.read_len)?;
        if bytes.is_empty() {
            debug!(expected = layout.read_len, "no data from device");
        } else if bytes.len() < layout.read_len {
            warn!(
                received = bytes.len(),
                expected = layout.read_len,
                "short read from device"
            );
        }

        let flat = decode(&bytes, layout.width_rx, layout.endianness)?;
        let channels = reshape(&flat, layout.receive_channels)?;
        debug!(
            elements = flat.len(),
            channels = channels.len(),
            "received cycle"
        );
        Ok(Received { bytes, channels })
    }

    /// Transmit `channels`, then receive the device's answer.
    pub fn exchange<C: AsRef<[Element]>>(&mut self, channels: &[C]) -> Result<Exchange> {
        let transmitted = self.transmit(channels)?;
        let received = self.receive()?;
        Ok(Exchange {
            transmitted,
            received,
        })
    }

    /// Borrow the transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the link and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T> std::fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use fifolink_codec::Endianness;
    use fifolink_transport::{Loopback, TransportError};

    use super::*;
    use crate::error::LinkError;

    fn small_config() -> LinkConfig {
        LinkConfig {
            width_tx: 2,
            width_rx: 2,
            channels_tx: 2,
            channels_rx: 2,
            depth: 3,
            endianness: Endianness::Big,
        }
    }

    #[test]
    fn transmit_writes_interleaved_bytes() {
        let mut link = Link::new(Loopback::new(), small_config()).unwrap();
        let sent = link.transmit(&[vec![1u64, 2, 3], vec![0x100, 0x200, 0x300]]).unwrap();
        assert_eq!(
            sent.as_ref(),
            &[0, 1, 1, 0, 0, 2, 2, 0, 0, 3, 3, 0]
        );
        assert_eq!(link.get_ref().pending(), 12);
    }

    #[test]
    fn transmit_checks_channel_count() {
        let mut link = Link::new(Loopback::new(), small_config()).unwrap();
        let err = link.transmit(&[vec![1u64, 2, 3]]).unwrap_err();
        assert!(matches!(
            err,
            LinkError::Codec(CodecError::ChannelCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert_eq!(link.get_ref().pending(), 0);
    }

    #[test]
    fn transmit_checks_depth() {
        let mut link = Link::new(Loopback::new(), small_config()).unwrap();
        let err = link.transmit(&[vec![1u64, 2, 3], vec![4, 5]]).unwrap_err();
        assert!(matches!(
            err,
            LinkError::Codec(CodecError::ChannelLengthMismatch {
                channel: 1,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn transmit_rejects_out_of_range_without_writing() {
        let mut link = Link::new(Loopback::new(), small_config()).unwrap();
        let err = link.transmit(&[vec![1u64, 2, 3], vec![4, 5, 0x1_0000]]).unwrap_err();
        assert!(matches!(
            err,
            LinkError::Codec(CodecError::ValueOutOfRange { value: 0x1_0000, .. })
        ));
        assert_eq!(link.get_ref().pending(), 0);
    }

    #[test]
    fn exchange_over_loopback_restores_channels() {
        let mut link = Link::new(Loopback::new(), small_config()).unwrap();
        let channels: Vec<Vec<Element>> = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let exchange = link.exchange(&channels).unwrap();
        assert_eq!(exchange.received.channels, channels);
        assert_eq!(exchange.received.bytes, exchange.transmitted);
        assert!(exchange.received.is_complete(link.layout().read_len));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = LinkConfig {
            width_tx: 0,
            ..small_config()
        };
        let err = Link::new(Loopback::new(), config).unwrap_err();
        assert!(matches!(err, LinkError::Codec(CodecError::InvalidWidth(0))));
    }

    struct Unplugged;

    impl Transport for Unplugged {
        fn write(&mut self, _bytes: &[u8]) -> fifolink_transport::Result<()> {
            Err(TransportError::Closed)
        }

        fn read(&mut self, _max_len: usize) -> fifolink_transport::Result<Bytes> {
            Err(TransportError::Closed)
        }
    }

    #[test]
    fn transport_errors_pass_through() {
        let mut link = Link::new(Unplugged, small_config()).unwrap();
        let err = link.transmit(&[vec![1u64, 2, 3], vec![4, 5, 6]]).unwrap_err();
        assert!(matches!(err, LinkError::Transport(TransportError::Closed)));
        let err = link.receive().unwrap_err();
        assert!(matches!(err, LinkError::Transport(TransportError::Closed)));
    }
}
