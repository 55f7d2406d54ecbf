use dlt645_frame::codec::parse_hex;
use dlt645_frame::{read_frame, Frame, IterBytes, ProtocolVersion, Received};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = decode_hex(&args.hex.join(""), args.protocol)?;
    print_frame(&frame, format);
    Ok(SUCCESS)
}

fn decode_hex(input: &str, version: ProtocolVersion) -> CliResult<Frame> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = parse_hex(&compact)
        .ok_or_else(|| CliError::new(USAGE, format!("not a hex byte string: {input}")))?;

    // Same path as bytes arriving on the bus, so wake bytes are tolerated.
    let mut source = IterBytes::new(bytes.into_iter().map(Received::Byte));
    read_frame(&mut source, version).map_err(|err| frame_error("decode failed", err))
}
