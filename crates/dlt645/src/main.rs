mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "dlt645", version, about = "DL/T645 meter reading CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use dlt645_transport::Parity;

    use super::*;

    #[test]
    fn parses_energy_with_address_and_serial_flags() {
        let cli = Cli::try_parse_from([
            "dlt645",
            "energy",
            "000022076396",
            "--port",
            "/dev/ttyS1",
            "-b",
            "2400",
            "-P",
            "N",
            "--timeout",
            "500ms",
        ])
        .expect("energy args should parse");

        let Command::Energy(args) = cli.command else {
            panic!("expected energy command");
        };
        assert_eq!(args.address.unwrap().to_string(), "000022076396");
        let config = args.serial.to_config().unwrap();
        assert_eq!(config.port, "/dev/ttyS1");
        assert_eq!(config.baud_rate, 2400);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.timeout, std::time::Duration::from_millis(500));
    }

    #[test]
    fn serial_defaults_match_meter_line_settings() {
        let cli = Cli::try_parse_from(["dlt645", "addr"]).expect("addr args should parse");
        let Command::Addr(args) = cli.command else {
            panic!("expected addr command");
        };
        let config = args.serial.to_config().unwrap();
        assert_eq!(config.baud_rate, 1200);
        assert_eq!(config.data_bits, 8);
        assert_eq!(config.parity, Parity::Even);
        assert_eq!(config.stop_bits, 1);
    }

    #[test]
    fn rejects_malformed_address() {
        let err = Cli::try_parse_from(["dlt645", "energy", "0011"])
            .expect_err("short address should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "dlt645",
            "encode",
            "--function",
            "read_addr",
            "--protocol",
            "2007",
            "--no-wake",
        ])
        .expect("encode args should parse");
        assert!(matches!(cli.command, Command::Encode(_)));
    }
}
