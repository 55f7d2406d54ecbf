use std::io::{Read, Write};

use serialport::SerialPort;
use tracing::{debug, info};

use crate::config::SerialConfig;
use crate::error::{Result, TransportError};

/// An open serial line to one or more meters.
///
/// Reads block for at most the configured timeout and then fail with
/// `TimedOut`, which the frame reader treats as "no byte available".
pub struct MeterStream {
    port: Box<dyn SerialPort>,
}

impl MeterStream {
    /// Wrap an already opened port.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Try to clone this stream (a second handle to the same port).
    pub fn try_clone(&self) -> Result<Self> {
        let port = self.port.try_clone()?;
        Ok(Self { port })
    }
}

impl Read for MeterStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for MeterStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.port.flush()
    }
}

/// Open the port described by `config`.
pub fn open(config: &SerialConfig) -> Result<MeterStream> {
    let port = config
        .builder()?
        .open()
        .map_err(|source| TransportError::Open {
            port: config.port.clone(),
            source,
        })?;
    info!(
        port = %config.port,
        baud_rate = config.baud_rate,
        line = %format!("{}{}{}", config.data_bits, config.parity, config.stop_bits),
        "serial port opened"
    );
    Ok(MeterStream::from_port(port))
}

/// Names of the serial ports present on this machine.
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports()?;
    debug!(count = ports.len(), "enumerated serial ports");
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
