use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use fifolink_codec::Element;
use serde::Serialize;

/// Samples or bytes shown per row in dumps.
pub const ROW_WIDTH: usize = 16;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Space-separated uppercase hex, e.g. `01 0A FF`.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hex dump, [`ROW_WIDTH`] bytes per row.
pub fn hex_rows(bytes: &[u8]) -> Vec<String> {
    bytes.chunks(ROW_WIDTH).map(hex_string).collect()
}

/// Right-aligned values, [`ROW_WIDTH`] per row.
pub fn value_rows(values: &[Element]) -> Vec<String> {
    values
        .chunks(ROW_WIDTH)
        .map(|row| {
            row.iter()
                .map(|v| format!("{v:>10}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

pub fn print_hex_dump(title: &str, bytes: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&hex_rows(bytes)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET".to_string(), title.to_uppercase()]);
            for (row, line) in hex_rows(bytes).into_iter().enumerate() {
                table.add_row(vec![format!("{:#06x}", row * ROW_WIDTH), line]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{title} ({} bytes):", bytes.len());
            for line in hex_rows(bytes) {
                println!("  {line}");
            }
        }
    }
}

/// One row per depth index, one column per channel. Cells past the end of
/// a short channel are shown as `-`.
pub fn channel_table(channels: &[Vec<Element>]) -> Table {
    let mut header = vec!["DEPTH".to_string()];
    header.extend((0..channels.len()).map(|c| format!("CH{c}")));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    let depth = channels.iter().map(Vec::len).max().unwrap_or(0);
    for d in 0..depth {
        let mut row = vec![d.to_string()];
        row.extend(channels.iter().map(|channel| {
            channel
                .get(d)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string())
        }));
        table.add_row(row);
    }
    table
}

pub fn print_channels(channels: &[Vec<Element>], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&channels),
        OutputFormat::Table => println!("{}", channel_table(channels)),
        OutputFormat::Pretty => {
            for (index, channel) in channels.iter().enumerate() {
                println!("channel {index} ({} samples):", channel.len());
                for line in value_rows(channel) {
                    println!("  {line}");
                }
            }
        }
    }
}
