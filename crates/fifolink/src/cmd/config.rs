use comfy_table::{presets::UTF8_FULL, Table};

use crate::cmd::ConfigArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

pub fn run(args: ConfigArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = args
        .link
        .resolve()?
        .validate()
        .map_err(|err| codec_error("invalid configuration", err))?;

    let rows = [
        ("width_tx", layout.width_tx.to_string()),
        ("width_rx", layout.width_rx.to_string()),
        ("channels_tx", layout.channels_tx.to_string()),
        ("channels_rx", layout.channels_rx.to_string()),
        ("depth", layout.depth.to_string()),
        ("endianness", layout.endianness.to_string()),
        ("width_ratio", layout.width_ratio.to_string()),
        ("receive_channels", layout.receive_channels.to_string()),
        ("transmit_len", layout.transmit_len().to_string()),
        ("read_len", layout.read_len.to_string()),
    ];

    match format {
        OutputFormat::Json => print_json(&layout),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec!["KEY", "VALUE"]);
            for (key, value) in rows {
                table.add_row(vec![key.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (key, value) in rows {
                println!("{key}: {value}");
            }
        }
    }
    Ok(SUCCESS)
}
