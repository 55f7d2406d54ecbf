use std::io::{Read, Write};

use dlt645_frame::{
    Address, Frame, FrameConfig, FrameReader, FrameWriter, ProtocolVersion, DISCOVERY_REQUEST,
};
use dlt645_transport::{MeterStream, SerialConfig};
use tracing::{debug, info};

use crate::error::{Result, StationError};

/// Data identifier of the combined active energy register.
pub const ACTIVE_ENERGY_ID: &str = "00000000";

/// Length of a data identifier in hex digits.
pub const IDENTIFIER_HEX_LEN: usize = 8;

/// Station session configuration.
#[derive(Debug, Clone)]
pub struct StationConfig {
    /// Revision spoken by the meter. Default: DL/T645-2007.
    pub version: ProtocolVersion,
    /// Prefix requests with wake-up bytes. Default: true.
    pub wake: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            version: ProtocolVersion::default(),
            wake: true,
        }
    }
}

impl StationConfig {
    fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            version: self.version,
            wake: self.wake,
        }
    }
}

/// A request/response session with the meters on one serial line.
///
/// Exchanges are strictly sequential: every request is followed by reading
/// exactly one reply frame. The reply's response flag is left for the caller
/// to inspect.
pub struct Station<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    config: StationConfig,
}

/// Open a serial port and start a session on it.
pub fn connect(
    serial: &SerialConfig,
    config: StationConfig,
) -> Result<Station<MeterStream, MeterStream>> {
    let stream = dlt645_transport::open(serial)?;
    let reader_stream = stream.try_clone()?;
    Ok(Station::from_parts(reader_stream, stream, config))
}

impl<R: Read, W: Write> Station<R, W> {
    /// Build a session from separate read and write halves.
    pub fn from_parts(reader: R, writer: W, config: StationConfig) -> Self {
        let frame_config = config.frame_config();
        Self {
            reader: FrameReader::with_config(reader, frame_config.clone()),
            writer: FrameWriter::with_config(writer, frame_config),
            config,
        }
    }

    /// Ask the (single) station on the bus for its address.
    pub fn request_address(&mut self) -> Result<Address> {
        self.writer.send_raw(&DISCOVERY_REQUEST)?;
        let reply = self.reader.read_frame()?;
        let address = reply.address.ok_or(StationError::MissingAddress)?;
        info!(%address, "station address discovered");
        Ok(address)
    }

    /// Send `request` and read one reply.
    pub fn transact(&mut self, request: &Frame) -> Result<Frame> {
        self.writer.write_frame(request)?;
        let reply = self.reader.read_frame()?;
        debug!(
            request = %request,
            reply = %reply,
            error_flag = reply.control.is_error(),
            "exchange complete"
        );
        Ok(reply)
    }

    /// Read the register named by `identifier` (hex) from `address`.
    pub fn read_data(&mut self, address: Option<Address>, identifier: &str) -> Result<Frame> {
        let mut request = Frame::with_version(address, self.config.version);
        request.data = Some(identifier.to_string());
        self.transact(&request)
    }

    /// Active energy of `address`, in kWh.
    pub fn active_energy(&mut self, address: Address) -> Result<f64> {
        let reply = self.read_data(Some(address), ACTIVE_ENERGY_ID)?;
        let data = reply.data.unwrap_or_default();
        let value = parse_energy(&data)?;
        info!(%address, kwh = value, "active energy read");
        Ok(value)
    }

    /// Current session configuration.
    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Take the read and write halves back.
    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }
}

/// Extract the energy reading from an active energy reply payload.
///
/// The payload ends with the echoed identifier; the digits before it are the
/// reading in hundredths of a kWh.
pub fn parse_energy(data: &str) -> Result<f64> {
    if !data.is_ascii() {
        return Err(StationError::InvalidValue(data.to_string()));
    }
    let split = data.len().saturating_sub(IDENTIFIER_HEX_LEN);
    let (digits, identifier) = data.split_at(split);
    if identifier != ACTIVE_ENERGY_ID {
        return Err(StationError::UnexpectedIdentifier {
            expected: ACTIVE_ENERGY_ID.to_string(),
            actual: identifier.to_string(),
        });
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StationError::InvalidValue(digits.to_string()));
    }
    let hundredths: u64 = digits
        .parse()
        .map_err(|_| StationError::InvalidValue(digits.to_string()))?;
    Ok(hundredths as f64 / 100.0)
}
