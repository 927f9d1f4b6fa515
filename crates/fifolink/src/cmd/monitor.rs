use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fifolink_link::Link;
use fifolink_transport::StreamTransport;
use serde::Serialize;
use tracing::{debug, info};

use crate::cmd::MonitorArgs;
use crate::exit::{codec_error, link_error, transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_channels, print_json, OutputFormat};

#[derive(Serialize)]
struct CycleOutput<'a> {
    cycle: usize,
    length: usize,
    complete: bool,
    channels: &'a [Vec<u64>],
}

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = args
        .link
        .resolve()?
        .validate()
        .map_err(|err| codec_error("invalid configuration", err))?;
    let transport =
        StreamTransport::open(&args.device).map_err(|err| transport_error("open failed", err))?;
    let mut link = Link::with_layout(transport, layout);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let backoff = Duration::from_millis(args.idle_backoff_ms);
    let mut cycles = 0usize;
    let mut idle = 0usize;
    while running.load(Ordering::SeqCst) {
        let received = link
            .receive()
            .map_err(|err| link_error("receive failed", err))?;
        if received.bytes.is_empty() {
            idle = idle.saturating_add(1);
            if args.max_idle > 0 && idle >= args.max_idle {
                info!(idle, cycles, "device idle, stopping");
                break;
            }
            debug!(idle, "no data this cycle");
            std::thread::sleep(backoff);
            continue;
        }
        idle = 0;

        let complete = received.is_complete(layout.read_len);
        match format {
            OutputFormat::Json => print_json(&CycleOutput {
                cycle: cycles,
                length: received.bytes.len(),
                complete,
                channels: &received.channels,
            }),
            other => {
                println!(
                    "cycle {cycles}: {} bytes{}",
                    received.bytes.len(),
                    if complete { "" } else { " (short read)" }
                );
                print_channels(&received.channels, other);
            }
        }
        cycles = cycles.saturating_add(1);

        if let Some(count) = args.count {
            if cycles >= count {
                break;
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
