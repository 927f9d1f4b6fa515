//! Transmit/receive cycles over a byte transport.
//!
//! A [`Link`] owns a [`Transport`](fifolink_transport::Transport) and a
//! validated [`LinkLayout`](fifolink_codec::LinkLayout). Each cycle runs the
//! pure codec and interleaver around a single blocking write or read.

pub mod error;
pub mod link;

pub use error::{LinkError, Result};
pub use link::{Exchange, Link, Received};
