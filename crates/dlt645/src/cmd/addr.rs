use dlt645_station::{connect, StationConfig};

use crate::cmd::AddrArgs;
use crate::exit::{station_error, CliResult, SUCCESS};
use crate::output::{print_value, OutputFormat};

pub fn run(args: AddrArgs, format: OutputFormat) -> CliResult<i32> {
    let serial = args.serial.to_config()?;
    let config = StationConfig {
        version: args.serial.protocol,
        ..StationConfig::default()
    };
    let mut station = connect(&serial, config).map_err(|err| station_error("open failed", err))?;

    let address = station
        .request_address()
        .map_err(|err| station_error("address request failed", err))?;

    print_value("address", "Station address", address.to_string(), None, format);
    Ok(SUCCESS)
}
