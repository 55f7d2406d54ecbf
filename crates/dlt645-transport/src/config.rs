use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, TransportError};

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl FromStr for Parity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "none" => Ok(Parity::None),
            "o" | "odd" => Ok(Parity::Odd),
            "e" | "even" => Ok(Parity::Even),
            other => Err(format!("unknown parity: {other} (expected N, E or O)")),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Parity::None => "N",
            Parity::Odd => "O",
            Parity::Even => "E",
        })
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

/// Serial line settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port identifier. Default: `/dev/ttyUSB0`.
    pub port: String,
    /// Bit rate. Default: 1200.
    pub baud_rate: u32,
    /// Data bits per character (5-8). Default: 8.
    pub data_bits: u8,
    /// Default: even.
    pub parity: Parity,
    /// Stop bits (1 or 2). Default: 1.
    pub stop_bits: u8,
    /// Read/write timeout; a read that waits longer counts as "no byte".
    /// Default: 5s.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 1200,
            data_bits: 8,
            parity: Parity::Even,
            stop_bits: 1,
            timeout: Duration::from_secs(5),
        }
    }
}

impl SerialConfig {
    /// Check the settings and map them onto `serialport` types.
    pub(crate) fn builder(&self) -> Result<serialport::SerialPortBuilder> {
        if self.port.trim().is_empty() {
            return Err(TransportError::InvalidConfig(
                "port must not be empty".to_string(),
            ));
        }
        if self.baud_rate == 0 {
            return Err(TransportError::InvalidConfig(
                "baud rate must be greater than zero".to_string(),
            ));
        }
        Ok(serialport::new(self.port.as_str(), self.baud_rate)
            .data_bits(data_bits(self.data_bits)?)
            .parity(self.parity.into())
            .stop_bits(stop_bits(self.stop_bits)?)
            .timeout(self.timeout))
    }
}

fn data_bits(bits: u8) -> Result<serialport::DataBits> {
    match bits {
        5 => Ok(serialport::DataBits::Five),
        6 => Ok(serialport::DataBits::Six),
        7 => Ok(serialport::DataBits::Seven),
        8 => Ok(serialport::DataBits::Eight),
        other => Err(TransportError::InvalidConfig(format!(
            "unsupported data bits: {other}"
        ))),
    }
}

fn stop_bits(bits: u8) -> Result<serialport::StopBits> {
    match bits {
        1 => Ok(serialport::StopBits::One),
        2 => Ok(serialport::StopBits::Two),
        other => Err(TransportError::InvalidConfig(format!(
            "unsupported stop bits: {other}"
        ))),
    }
}

/// Parse a timeout: `5`, `2.5`, `2.5s` or `500ms`. Bare numbers are seconds.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    let invalid = || TransportError::InvalidConfig(format!("invalid timeout: {input:?}"));

    let (number, nanos_per_unit) = match input.strip_suffix("ms") {
        Some(millis) => (millis, 1e6),
        None => (input.strip_suffix('s').unwrap_or(input), 1e9),
    };
    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    let nanos = (value * nanos_per_unit).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos >= u64::MAX as f64 {
        return Err(invalid());
    }
    if nanos == 0.0 {
        return Err(TransportError::InvalidConfig(
            "timeout must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_nanos(nanos as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_meter_line_settings() {
        let config = SerialConfig::default();
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 1200);
        assert_eq!(config.data_bits, 8);
        assert_eq!(config.parity, Parity::Even);
        assert_eq!(config.stop_bits, 1);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.builder().is_ok());
    }

    #[test]
    fn rejects_unsupported_line_settings() {
        let config = SerialConfig {
            data_bits: 9,
            ..SerialConfig::default()
        };
        assert!(matches!(
            config.builder(),
            Err(TransportError::InvalidConfig(_))
        ));

        let config = SerialConfig {
            stop_bits: 3,
            ..SerialConfig::default()
        };
        assert!(config.builder().is_err());

        let config = SerialConfig {
            port: " ".to_string(),
            ..SerialConfig::default()
        };
        assert!(config.builder().is_err());
    }

    #[test]
    fn parity_parses_short_and_long_names() {
        assert_eq!("E".parse::<Parity>(), Ok(Parity::Even));
        assert_eq!("odd".parse::<Parity>(), Ok(Parity::Odd));
        assert_eq!("None".parse::<Parity>(), Ok(Parity::None));
        assert!("x".parse::<Parity>().is_err());
        assert_eq!(Parity::Even.to_string(), "E");
    }

    #[test]
    fn parse_duration_accepts_fractional_seconds() {
        assert_eq!(parse_duration("5").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("2.5").unwrap(), Duration::from_millis(2500));
        assert_eq!(parse_duration("0.3s").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration(" 150ms ").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("1.5ms").unwrap(), Duration::from_micros(1500));
    }

    #[test]
    fn parse_duration_rejects_unusable_timeouts() {
        for input in ["", "s", "ms", "bad", "0", "0.0s", "-1", "NaN", "inf", "1e30"] {
            assert!(
                matches!(parse_duration(input), Err(TransportError::InvalidConfig(_))),
                "{input:?} should be rejected"
            );
        }
    }
}
