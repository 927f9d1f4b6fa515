/// Errors that can occur during a link cycle.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Codec, interleaver or configuration error.
    #[error("codec error: {0}")]
    Codec(#[from] fifolink_codec::CodecError),

    /// Transport-level error, passed through unmodified.
    #[error("transport error: {0}")]
    Transport(#[from] fifolink_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, LinkError>;
