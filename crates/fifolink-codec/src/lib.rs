//! Fixed-width integer codec and channel interleaver.
//!
//! This is the core of fifolink. A transmit cycle looks like:
//! - N channels of `depth` samples are interleaved round-robin into one flat
//!   sequence ([`flatten`])
//! - every sample is encoded into 1-4 bytes, big or little endian ([`encode`])
//!
//! A receive cycle decodes the raw bytes ([`decode`]) and splits the flat
//! sequence back into channels ([`reshape`]), using the receive channel count
//! derived by [`LinkConfig::validate`].
//!
//! Values are validated strictly. Nothing is masked or wrapped.

pub mod codec;
pub mod config;
pub mod error;
pub mod interleave;

pub use codec::{decode, decode_into, encode, encode_into, Element, Endianness, Width};
pub use config::{LinkConfig, LinkLayout};
pub use error::{CodecError, Result};
pub use interleave::{flatten, reshape, ChannelSet};
