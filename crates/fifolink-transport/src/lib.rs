//! Byte transport capability for fifolink.
//!
//! The codec and interleaver never touch a device directly. They are handed
//! something implementing [`Transport`]:
//! - [`StreamTransport`] over any `Read + Write` (a device node, a socket)
//! - [`Loopback`], an in-memory wire that returns what was written
//!
//! This is the lowest layer of fifolink. Line settings (baud, parity, stop
//! bits) are configured outside the process.

pub mod error;
pub mod loopback;
pub mod stream;
pub mod traits;

pub use error::{Result, TransportError};
pub use loopback::Loopback;
pub use stream::StreamTransport;
pub use traits::Transport;
