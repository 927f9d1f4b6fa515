use std::fs;
use std::path::Path;

use fifolink_codec::{ChannelSet, Element, LinkLayout};
use fifolink_link::{Exchange, Link};
use serde::Serialize;
use tracing::info;

use crate::cmd::ExchangeArgs;
use crate::exit::{codec_error, io_error, link_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{hex_string, print_channels, print_hex_dump, print_json, OutputFormat};

#[derive(Serialize)]
struct BytesOutput {
    length: usize,
    hex: String,
}

#[derive(Serialize)]
struct ExchangeOutput<'a> {
    layout: &'a LinkLayout,
    transmitted: BytesOutput,
    received: BytesOutput,
    complete: bool,
    channels: &'a ChannelSet,
}

pub fn run(args: ExchangeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.link.resolve()?;
    let layout = config
        .validate()
        .map_err(|err| codec_error("invalid configuration", err))?;

    let channels = match &args.input {
        Some(path) => load_matrix(path)?,
        None => ramp(&layout),
    };

    let transport = args.target.open()?;
    let mut link = Link::with_layout(transport, layout);
    let exchange = link
        .exchange(&channels)
        .map_err(|err| link_error("exchange failed", err))?;
    info!(
        transmitted = exchange.transmitted.len(),
        received = exchange.received.bytes.len(),
        "exchange complete"
    );

    print_exchange(&exchange, &layout, args.dump, format);
    Ok(SUCCESS)
}

/// Channel `c` carries `c*depth+1 ..= (c+1)*depth`.
fn ramp(layout: &LinkLayout) -> ChannelSet {
    let depth = layout.depth as Element;
    (0..layout.channels_tx as Element)
        .map(|c| (c * depth + 1..=(c + 1) * depth).collect())
        .collect()
}

fn load_matrix(path: &Path) -> CliResult<ChannelSet> {
    let text = fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            DATA_INVALID,
            format!(
                "{} is not a JSON matrix of non-negative integers: {err}",
                path.display()
            ),
        )
    })
}

fn print_exchange(exchange: &Exchange, layout: &LinkLayout, dump: bool, format: OutputFormat) {
    let received = &exchange.received;
    match format {
        OutputFormat::Json => print_json(&ExchangeOutput {
            layout,
            transmitted: BytesOutput {
                length: exchange.transmitted.len(),
                hex: hex_string(&exchange.transmitted),
            },
            received: BytesOutput {
                length: received.bytes.len(),
                hex: hex_string(&received.bytes),
            },
            complete: received.is_complete(layout.read_len),
            channels: &received.channels,
        }),
        other => {
            if dump {
                print_hex_dump("transmitted", &exchange.transmitted, other);
                print_hex_dump("received", &received.bytes, other);
            }
            if !received.is_complete(layout.read_len) {
                println!(
                    "short read: {} of {} bytes",
                    received.bytes.len(),
                    layout.read_len
                );
            }
            print_channels(&received.channels, other);
        }
    }
}
