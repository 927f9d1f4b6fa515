//! Run one transmit/receive cycle against an in-memory loopback.
//!
//! Transmits two channels of 2-byte samples and reads them back as 1-byte
//! samples, which the link reshapes into four channels.
//!
//! Run with: `cargo run --example loopback-cycle`

use fifolink::codec::{Element, Endianness, LinkConfig};
use fifolink::link::Link;
use fifolink::transport::Loopback;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LinkConfig {
        width_tx: 2,
        width_rx: 1,
        channels_tx: 2,
        channels_rx: 2,
        depth: 4,
        endianness: Endianness::Big,
    };
    let mut link = Link::new(Loopback::new(), config)?;

    let channels: Vec<Vec<Element>> = vec![
        vec![0x0102, 0x0304, 0x0506, 0x0708],
        vec![0x1112, 0x1314, 0x1516, 0x1718],
    ];
    let exchange = link.exchange(&channels)?;

    println!("transmitted {:02X?}", exchange.transmitted.as_ref());
    for (index, channel) in exchange.received.channels.iter().enumerate() {
        println!("rx channel {index}: {channel:02X?}");
    }
    Ok(())
}
