use dlt645_station::{connect, StationConfig};

use crate::cmd::EnergyArgs;
use crate::exit::{station_error, CliResult, SUCCESS};
use crate::output::{print_value, OutputFormat};

pub fn run(args: EnergyArgs, format: OutputFormat) -> CliResult<i32> {
    let serial = args.serial.to_config()?;
    let config = StationConfig {
        version: args.serial.protocol,
        ..StationConfig::default()
    };
    let mut station = connect(&serial, config).map_err(|err| station_error("open failed", err))?;

    let address = match args.address {
        Some(address) => address,
        None => {
            let address = station
                .request_address()
                .map_err(|err| station_error("address request failed", err))?;
            eprintln!("Station address: {address}");
            address
        }
    };

    let kwh = station
        .active_energy(address)
        .map_err(|err| station_error("energy read failed", err))?;

    print_value("active_energy", "Active energy", kwh, Some("kWh"), format);
    Ok(SUCCESS)
}
