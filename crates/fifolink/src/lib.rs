//! Exchange interleaved fixed-width integer vectors with FIFO-backed devices.
//!
//! fifolink turns per-channel sample vectors into the flat byte stream a
//! device FIFO expects, and turns the device's answer back into channels.
//!
//! # Crate Structure
//!
//! - [`transport`] — Byte transport capability (device streams, loopback)
//! - [`codec`] — Fixed-width codec, interleaver and link configuration
//! - [`link`] — Transmit/receive cycles over a transport

/// Re-export transport types.
pub mod transport {
    pub use fifolink_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use fifolink_codec::*;
}

/// Re-export link types.
pub mod link {
    pub use fifolink_link::*;
}
