use dlt645_frame::{Function, ProtocolVersion};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("dlt645 {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: dlt645");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    for version in [ProtocolVersion::Dlt645_2007, ProtocolVersion::Dlt645_1997] {
        println!("{version}: {}", function_codes(version).join(" "));
    }

    Ok(SUCCESS)
}

/// `NAME=0xNN` for every function `version` defines, in code order.
fn function_codes(version: ProtocolVersion) -> Vec<String> {
    let mut codes: Vec<(u8, Function)> = Function::ALL
        .iter()
        .filter_map(|function| function.code(version).map(|code| (code, *function)))
        .collect();
    codes.sort_by_key(|(code, _)| *code);
    codes
        .into_iter()
        .map(|(code, function)| format!("{}={code:#04x}", function.name()))
        .collect()
}
