use clap::{Args, Subcommand};
use dlt645_frame::{Address, Function, ProtocolVersion};
use dlt645_transport::{parse_duration, Parity, SerialConfig};

use crate::exit::{transport_error, CliResult};
use crate::output::OutputFormat;

pub mod addr;
pub mod decode;
pub mod encode;
pub mod energy;
pub mod monitor;
pub mod ports;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Request the address of the station on the bus.
    Addr(AddrArgs),
    /// Read a station's active energy (kWh).
    Energy(EnergyArgs),
    /// Print every frame seen on the bus.
    Monitor(MonitorArgs),
    /// Decode a frame given as hex.
    Decode(DecodeArgs),
    /// Encode a request frame and print it as hex.
    Encode(EncodeArgs),
    /// List serial ports.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Addr(args) => addr::run(args, format),
        Command::Energy(args) => energy::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Serial line settings shared by the commands that talk to a meter.
#[derive(Args, Debug)]
pub struct SerialArgs {
    /// Serial port to use.
    #[arg(short = 'p', long, env = "DLT645_PORT", default_value = "/dev/ttyUSB0")]
    pub port: String,
    /// Baud rate.
    #[arg(short = 'b', long, env = "DLT645_BAUD_RATE", default_value = "1200")]
    pub baud_rate: u32,
    /// Number of data bits.
    #[arg(short = 'B', long, env = "DLT645_DATA_BITS", default_value = "8")]
    pub data_bits: u8,
    /// Parity check (N, E or O).
    #[arg(short = 'P', long, env = "DLT645_PARITY", default_value = "E")]
    pub parity: Parity,
    /// Number of stop bits.
    #[arg(short = 's', long, env = "DLT645_STOP_BITS", default_value = "1")]
    pub stop_bits: u8,
    /// Read/write timeout in seconds, fractions allowed (e.g. 5, 2.5, 500ms).
    #[arg(short = 't', long, env = "DLT645_TIMEOUT", default_value = "5s")]
    pub timeout: String,
    /// Protocol revision spoken by the meter (2007 or 1997).
    #[arg(long = "protocol", env = "DLT645_PROTOCOL", default_value = "2007")]
    pub protocol: ProtocolVersion,
}

impl SerialArgs {
    pub fn to_config(&self) -> CliResult<SerialConfig> {
        let timeout =
            parse_duration(&self.timeout).map_err(|err| transport_error("--timeout", err))?;
        Ok(SerialConfig {
            port: self.port.clone(),
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            parity: self.parity,
            stop_bits: self.stop_bits,
            timeout,
        })
    }
}

#[derive(Args, Debug)]
pub struct AddrArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
}

#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Station address; requested from the bus when omitted.
    pub address: Option<Address>,
    #[command(flatten)]
    pub serial: SerialArgs,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Exit after N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex; spaces and wake-up bytes are allowed.
    #[arg(required = true, num_args = 1..)]
    pub hex: Vec<String>,
    /// Protocol revision used to name the function code.
    #[arg(long = "protocol", default_value = "2007")]
    pub protocol: ProtocolVersion,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Station address; broadcast when omitted.
    #[arg(long, short = 'a')]
    pub address: Option<Address>,
    /// Function to request (e.g. read_data, read_addr).
    #[arg(long, short = 'f', default_value = "read_data")]
    pub function: Function,
    /// Data payload as hex.
    #[arg(long, short = 'd')]
    pub data: Option<String>,
    /// Omit the wake-up preamble.
    #[arg(long)]
    pub no_wake: bool,
    /// Protocol revision (2007 or 1997).
    #[arg(long = "protocol", default_value = "2007")]
    pub protocol: ProtocolVersion,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
