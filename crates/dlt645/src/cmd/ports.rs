use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use crate::cmd::PortsArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct PortsOutput {
    ports: Vec<String>,
}

pub fn run(_args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let ports = dlt645_transport::available_ports()
        .map_err(|err| transport_error("port enumeration failed", err))?;

    match format {
        OutputFormat::Json => print_json(&PortsOutput { ports }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec!["PORT"]);
            for port in &ports {
                table.add_row(vec![port.as_str()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for port in &ports {
                println!("{port}");
            }
        }
    }
    Ok(SUCCESS)
}
