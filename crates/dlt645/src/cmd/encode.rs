use dlt645_frame::{encode_outbound, hex_dump, Frame};
use serde::Serialize;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput {
    frame: String,
    len: usize,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = encode(&args)?;
    match format {
        OutputFormat::Json => print_json(&EncodeOutput {
            frame: hex_dump(&bytes).replace(' ', ""),
            len: bytes.len(),
        }),
        OutputFormat::Raw => println!("{}", hex_dump(&bytes).replace(' ', "")),
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", hex_dump(&bytes)),
    }
    Ok(SUCCESS)
}

fn encode(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    let mut frame = Frame::request(args.address, args.protocol, args.function).ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("{} is not defined in {}", args.function, args.protocol),
        )
    })?;
    frame.data = args.data.clone();

    let bytes = encode_outbound(&frame, !args.no_wake)
        .map_err(|err| frame_error("encode failed", err))?;
    Ok(bytes.to_vec())
}
