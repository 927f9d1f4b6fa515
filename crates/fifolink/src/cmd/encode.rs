use fifolink_codec::{encode, Endianness, Width};
use serde::Serialize;

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{hex_string, print_hex_dump, print_json, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput {
    width: Width,
    endianness: Endianness,
    count: usize,
    length: usize,
    hex: String,
    bytes: Vec<u8>,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let width = Width::new(args.width).map_err(|err| codec_error("invalid width", err))?;
    let endianness = Endianness::from(args.endianness);

    let bytes = encode(&args.values, width, endianness)
        .map_err(|err| codec_error("encode failed", err))?;

    match format {
        OutputFormat::Json => print_json(&EncodeOutput {
            width,
            endianness,
            count: args.values.len(),
            length: bytes.len(),
            hex: hex_string(&bytes),
            bytes: bytes.to_vec(),
        }),
        other => print_hex_dump("encoded", &bytes, other),
    }
    Ok(SUCCESS)
}
