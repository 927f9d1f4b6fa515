use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Subcommand, ValueEnum};
use fifolink_codec::{Element, Endianness, LinkConfig};
use fifolink_transport::{Loopback, StreamTransport, Transport};
use tracing::debug;

use crate::exit::{io_error, transport_error, CliError, CliResult, DATA_INVALID, USAGE};
use crate::output::OutputFormat;

pub mod config;
pub mod decode;
pub mod encode;
pub mod exchange;
pub mod monitor;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode values into the raw byte layout.
    Encode(EncodeArgs),
    /// Decode raw bytes into values.
    Decode(DecodeArgs),
    /// Run one transmit/receive cycle against a device.
    Exchange(ExchangeArgs),
    /// Repeatedly receive cycles from a device and print them.
    Monitor(MonitorArgs),
    /// Print the resolved link configuration and derived layout.
    Config(ConfigArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Exchange(args) => exchange::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Config(args) => config::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Byte order flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ByteOrder {
    Big,
    Little,
}

impl From<ByteOrder> for Endianness {
    fn from(order: ByteOrder) -> Self {
        match order {
            ByteOrder::Big => Endianness::Big,
            ByteOrder::Little => Endianness::Little,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Values to encode (decimal or 0x-prefixed hex).
    #[arg(required = true, num_args = 1.., value_parser = parse_element)]
    pub values: Vec<Element>,
    /// Bytes per value (1-4).
    #[arg(long, short = 'w', default_value = "4")]
    pub width: u8,
    /// Byte order.
    #[arg(long, short = 'e', value_enum, default_value = "big")]
    pub endianness: ByteOrder,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["hex", "file"])))]
pub struct DecodeArgs {
    /// Hex bytes, e.g. "01 02 0a" or "0x01,0x02".
    pub hex: Option<String>,
    /// Read raw bytes from a file instead.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Bytes per value (1-4).
    #[arg(long, short = 'w', default_value = "4")]
    pub width: u8,
    /// Byte order.
    #[arg(long, short = 'e', value_enum, default_value = "big")]
    pub endianness: ByteOrder,
}

/// Link configuration: an optional JSON file, then per-field overrides.
#[derive(Args, Debug, Default)]
pub struct LinkArgs {
    /// JSON link configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Bytes per transmitted value (1-4).
    #[arg(long)]
    pub width_tx: Option<u8>,
    /// Bytes per received value (1-4).
    #[arg(long)]
    pub width_rx: Option<u8>,
    /// Parallel channels sent to the device.
    #[arg(long)]
    pub channels_tx: Option<usize>,
    /// Parallel channels returned by the device.
    #[arg(long)]
    pub channels_rx: Option<usize>,
    /// Samples per channel per cycle (device FIFO depth).
    #[arg(long)]
    pub depth: Option<usize>,
    /// Byte order in both directions.
    #[arg(long, value_enum)]
    pub endianness: Option<ByteOrder>,
}

impl LinkArgs {
    /// Load the config file (if any) and apply flag overrides.
    pub fn resolve(&self) -> CliResult<LinkConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => LinkConfig::default(),
        };

        if let Some(width) = self.width_tx {
            config.width_tx = width;
        }
        if let Some(width) = self.width_rx {
            config.width_rx = width;
        }
        if let Some(channels) = self.channels_tx {
            config.channels_tx = channels;
        }
        if let Some(channels) = self.channels_rx {
            config.channels_rx = channels;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(order) = self.endianness {
            config.endianness = order.into();
        }

        debug!(?config, "resolved link configuration");
        Ok(config)
    }
}

fn load_config(path: &Path) -> CliResult<LinkConfig> {
    let text = fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            USAGE,
            format!("invalid config {}: {err}", path.display()),
        )
    })
}

/// Where the bytes go.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["device", "loopback"])))]
pub struct DeviceArgs {
    /// Device node to open (configure line settings beforehand).
    #[arg(long, value_name = "PATH")]
    pub device: Option<PathBuf>,
    /// Use an in-memory loopback instead of a device.
    #[arg(long)]
    pub loopback: bool,
}

impl DeviceArgs {
    pub fn open(&self) -> CliResult<Box<dyn Transport>> {
        match &self.device {
            Some(path) => {
                let transport = StreamTransport::open(path)
                    .map_err(|err| transport_error("open failed", err))?;
                Ok(Box::new(transport))
            }
            None => Ok(Box::new(Loopback::new())),
        }
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("payload").required(true).args(["input", "ramp"])))]
pub struct ExchangeArgs {
    #[command(flatten)]
    pub target: DeviceArgs,
    #[command(flatten)]
    pub link: LinkArgs,
    /// JSON matrix of channels to send, e.g. [[1,2],[3,4]].
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Send a ramp: channel c carries c*depth+1 ..= (c+1)*depth.
    #[arg(long)]
    pub ramp: bool,
    /// Also print the raw transmitted and received bytes.
    #[arg(long)]
    pub dump: bool,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Device node to read from.
    pub device: PathBuf,
    #[command(flatten)]
    pub link: LinkArgs,
    /// Exit after N non-empty cycles.
    #[arg(long)]
    pub count: Option<usize>,
    /// Exit after N consecutive cycles that return no data (0 waits forever).
    #[arg(long, default_value = "10")]
    pub max_idle: usize,
    /// Pause after an empty cycle, in milliseconds.
    #[arg(long, default_value = "50")]
    pub idle_backoff_ms: u64,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub link: LinkArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Accept decimal or `0x`-prefixed hex.
pub fn parse_element(input: &str) -> Result<Element, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => Element::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|err| format!("invalid value {input:?}: {err}"))
}

/// Parse hex bytes separated by whitespace or commas, with or without a
/// `0x` prefix per byte. Unseparated runs are split into byte pairs.
pub fn parse_hex_bytes(input: &str) -> CliResult<Vec<u8>> {
    let mut bytes = Vec::new();
    for token in input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if digits.is_empty() || digits.len() % 2 != 0 {
            return Err(CliError::new(
                DATA_INVALID,
                format!("hex token {token:?} must have an even number of digits"),
            ));
        }
        for pair in digits.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair).unwrap_or("");
            let byte = u8::from_str_radix(pair, 16).map_err(|_| {
                CliError::new(DATA_INVALID, format!("invalid hex byte {pair:?} in {token:?}"))
            })?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_element_decimal_and_hex() {
        assert_eq!(parse_element("258"), Ok(258));
        assert_eq!(parse_element("0x0102"), Ok(0x0102));
        assert_eq!(parse_element("0XFF"), Ok(0xFF));
        assert!(parse_element("-1").is_err());
        assert!(parse_element("0xZZ").is_err());
    }

    #[test]
    fn parse_hex_bytes_accepts_common_spellings() {
        assert_eq!(parse_hex_bytes("01 02 0a").unwrap(), vec![1, 2, 10]);
        assert_eq!(parse_hex_bytes("0x01,0x02").unwrap(), vec![1, 2]);
        assert_eq!(parse_hex_bytes("0102FF").unwrap(), vec![1, 2, 0xFF]);
        assert!(parse_hex_bytes("").unwrap().is_empty());
    }

    #[test]
    fn parse_hex_bytes_rejects_odd_and_invalid_digits() {
        assert_eq!(parse_hex_bytes("012").unwrap_err().code, DATA_INVALID);
        assert_eq!(parse_hex_bytes("zz").unwrap_err().code, DATA_INVALID);
    }

    #[test]
    fn link_args_override_defaults() {
        let args = LinkArgs {
            width_tx: Some(2),
            depth: Some(8),
            endianness: Some(ByteOrder::Little),
            ..LinkArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.width_tx, 2);
        assert_eq!(config.width_rx, LinkConfig::default().width_rx);
        assert_eq!(config.depth, 8);
        assert_eq!(config.endianness, Endianness::Little);
    }

    #[test]
    fn link_args_read_config_file_then_override() {
        let dir = std::env::temp_dir().join(format!("fifolink-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("link.json");
        fs::write(&path, r#"{"width_tx": 2, "width_rx": 1, "depth": 4}"#).unwrap();

        let args = LinkArgs {
            config: Some(path.clone()),
            depth: Some(16),
            ..LinkArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.width_tx, 2);
        assert_eq!(config.width_rx, 1);
        assert_eq!(config.depth, 16);

        fs::write(&path, "{not json").unwrap();
        assert_eq!(args.resolve().unwrap_err().code, USAGE);

        let _ = fs::remove_dir_all(&dir);
    }
}
