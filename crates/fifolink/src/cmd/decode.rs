use std::fs;

use fifolink_codec::{decode, Element, Endianness, Width};
use serde::Serialize;

use crate::cmd::{parse_hex_bytes, DecodeArgs};
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_json, value_rows, OutputFormat};

#[derive(Serialize)]
struct DecodeOutput {
    width: Width,
    endianness: Endianness,
    length: usize,
    values: Vec<Element>,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let width = Width::new(args.width).map_err(|err| codec_error("invalid width", err))?;
    let endianness = Endianness::from(args.endianness);

    let bytes = match (&args.hex, &args.file) {
        (Some(hex), _) => parse_hex_bytes(hex)?,
        (None, Some(path)) => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        (None, None) => Vec::new(),
    };

    let values =
        decode(&bytes, width, endianness).map_err(|err| codec_error("decode failed", err))?;

    match format {
        OutputFormat::Json => print_json(&DecodeOutput {
            width,
            endianness,
            length: bytes.len(),
            values,
        }),
        OutputFormat::Table => {
            let mut table = comfy_table::Table::new();
            table
                .load_preset(comfy_table::presets::UTF8_FULL)
                .set_header(vec!["INDEX", "VALUE", "HEX"]);
            let digits = width.bytes() * 2;
            for (index, value) in values.iter().enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    value.to_string(),
                    format!("0x{value:0digits$X}"),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} values ({width}-byte, {endianness}):", values.len());
            for line in value_rows(&values) {
                println!("  {line}");
            }
        }
    }
    Ok(SUCCESS)
}
