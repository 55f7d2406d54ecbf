use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use dlt645_frame::{Direction, Frame, Response};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    address: Option<String>,
    direction: &'a str,
    response: &'a str,
    more: bool,
    function_code: u8,
    function: &'a str,
    protocol: String,
    data: &'a str,
    checksum_valid: Option<bool>,
    raw: String,
}

pub fn print_frame(frame: &Frame, format: OutputFormat) {
    let function = frame.function().map_or("UNKNOWN", |f| f.name());
    let out = FrameOutput {
        address: frame.address.map(|a| a.to_string()),
        direction: direction_name(frame.control.direction),
        response: response_name(frame.control.response),
        more: frame.control.more,
        function_code: frame.control.function,
        function,
        protocol: frame.version.to_string(),
        data: frame.data.as_deref().unwrap_or(""),
        checksum_valid: frame.is_valid(),
        raw: frame.to_string(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ADDRESS", "DIRECTION", "RESPONSE", "FUNCTION", "DATA"])
                .add_row(vec![
                    out.address.clone().unwrap_or_else(|| "broadcast".to_string()),
                    out.direction.to_string(),
                    out.response.to_string(),
                    format!("{} ({:#04x})", out.function, out.function_code),
                    out.data.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "address={} direction={} response={} more={} function={} ({:#04x}) data={}",
                out.address.as_deref().unwrap_or("broadcast"),
                out.direction,
                out.response,
                out.more,
                out.function,
                out.function_code,
                out.data
            );
        }
        OutputFormat::Raw => println!("{}", out.raw),
    }
}

/// Print a single labelled value, e.g. a station address or a reading.
pub fn print_value<T: Serialize + std::fmt::Display>(
    key: &str,
    label: &str,
    value: T,
    unit: Option<&str>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let mut object = serde_json::Map::new();
            object.insert(
                key.to_string(),
                serde_json::to_value(&value).unwrap_or(serde_json::Value::Null),
            );
            if let Some(unit) = unit {
                object.insert("unit".to_string(), serde_json::Value::from(unit));
            }
            print_json(&object);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec![label.to_uppercase(), "UNIT".to_string()])
                .add_row(vec![value.to_string(), unit.unwrap_or("").to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => match unit {
            Some(unit) => println!("{label}: {value} {unit}"),
            None => println!("{label}: {value}"),
        },
        OutputFormat::Raw => println!("{value}"),
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Master => "master",
        Direction::Station => "station",
    }
}

pub fn response_name(response: Response) -> &'static str {
    match response {
        Response::Correct => "correct",
        Response::Error => "error",
    }
}
