use std::fmt;
use std::str::FromStr;

use crate::constants::{ADDRESS_LEN, BROADCAST_ADDRESS, DATA_BIAS};
use crate::error::{FrameError, Result};
use crate::function::{Function, ProtocolVersion};

/// Sum of `bytes` modulo 256.
///
/// Computed over everything from the first start marker through the last
/// data byte.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// A 6-byte station address, held most-significant byte first.
///
/// Displayed as 12 lowercase hex digits. On the wire the byte order is
/// reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Create an address from display-order bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Decode from the 6 wire bytes.
    pub fn from_wire(wire: [u8; ADDRESS_LEN]) -> Self {
        let mut bytes = wire;
        bytes.reverse();
        Self(bytes)
    }

    /// Encode to the 6 wire bytes.
    pub fn to_wire(&self) -> [u8; ADDRESS_LEN] {
        let mut wire = self.0;
        wire.reverse();
        wire
    }

    /// Display-order bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the all-stations address.
    pub fn is_broadcast(&self) -> bool {
        self.0 == BROADCAST_ADDRESS
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(&self.0))
    }
}

impl FromStr for Address {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FrameError::InvalidAddress(s.to_string());
        if s.len() != ADDRESS_LEN * 2 {
            return Err(invalid());
        }
        let bytes = parse_hex(s).ok_or_else(invalid)?;
        let bytes: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

/// Encode an optional address, falling back to the broadcast address.
pub fn encode_address(address: Option<&Address>) -> [u8; ADDRESS_LEN] {
    match address {
        Some(address) => address.to_wire(),
        None => BROADCAST_ADDRESS,
    }
}

/// Transmission direction (control bit 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Request sent by the master.
    #[default]
    Master,
    /// Response sent by a station.
    Station,
}

/// Station response flag (control bit 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Response {
    #[default]
    Correct,
    Error,
}

/// The control byte, unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub direction: Direction,
    pub response: Response,
    /// More frames follow this one.
    pub more: bool,
    /// 5-bit function code; its meaning depends on the protocol version.
    pub function: u8,
}

const DIRECTION_BIT: u8 = 7;
const RESPONSE_BIT: u8 = 6;
const MORE_BIT: u8 = 5;
const FUNCTION_MASK: u8 = 0b0001_1111;

impl Control {
    /// A final, correct master request for `function` under `version`.
    ///
    /// Returns `None` if the revision has no such function.
    pub fn request(version: ProtocolVersion, function: Function) -> Option<Self> {
        function.code(version).map(|code| Self {
            direction: Direction::Master,
            response: Response::Correct,
            more: false,
            function: code,
        })
    }

    /// Control used by a fresh frame: a master READ_DATA request.
    pub fn default_for(version: ProtocolVersion) -> Self {
        // Every revision defines READ_DATA.
        let function = Function::ReadData.code(version).unwrap_or_default();
        Self {
            direction: Direction::Master,
            response: Response::Correct,
            more: false,
            function,
        }
    }

    /// Unpack a control byte.
    pub fn decode(byte: u8) -> Self {
        Self {
            direction: if (byte >> DIRECTION_BIT) & 1 == 1 {
                Direction::Station
            } else {
                Direction::Master
            },
            response: if (byte >> RESPONSE_BIT) & 1 == 1 {
                Response::Error
            } else {
                Response::Correct
            },
            more: (byte >> MORE_BIT) & 1 == 1,
            function: byte & FUNCTION_MASK,
        }
    }

    /// Pack into a control byte.
    pub fn encode(&self) -> u8 {
        let direction = match self.direction {
            Direction::Master => 0,
            Direction::Station => 1,
        };
        let response = match self.response {
            Response::Correct => 0,
            Response::Error => 1,
        };
        (direction << DIRECTION_BIT)
            | (response << RESPONSE_BIT)
            | (u8::from(self.more) << MORE_BIT)
            | (self.function & FUNCTION_MASK)
    }

    /// Resolve the function code through the table of `version`.
    pub fn function_kind(&self, version: ProtocolVersion) -> Option<Function> {
        Function::from_code(version, self.function)
    }

    /// Whether the station flagged this response as an error.
    pub fn is_error(&self) -> bool {
        self.response == Response::Error
    }
}

/// Decode wire data bytes into the display hex string.
///
/// Reverses the byte order and removes the bias from each byte.
pub fn decode_data(wire: &[u8]) -> String {
    let logical: Vec<u8> = wire
        .iter()
        .rev()
        .map(|b| b.wrapping_sub(DATA_BIAS))
        .collect();
    to_hex(&logical)
}

/// Encode a display hex string into wire data bytes.
pub fn encode_data(data: Option<&str>) -> Result<Vec<u8>> {
    let Some(data) = data else {
        return Ok(Vec::new());
    };
    let mut wire = parse_hex(data).ok_or_else(|| FrameError::InvalidData(data.to_string()))?;
    for byte in wire.iter_mut() {
        *byte = byte.wrapping_add(DATA_BIAS);
    }
    wire.reverse();
    Ok(wire)
}

/// Lowercase hex, two digits per byte.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse pairs of hex digits; `None` on odd length or a non-hex digit.
pub fn parse_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    s.as_bytes()
        .chunks_exact(2)
        .map(|pair| Some((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

fn nibble(digit: u8) -> Option<u8> {
    (digit as char).to_digit(16).map(|value| value as u8)
}

/// Configuration shared by frame readers and writers.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Revision used to interpret function codes. Default: DL/T645-2007.
    pub version: ProtocolVersion,
    /// Prefix outbound frames with wake-up bytes. Default: true.
    pub wake: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            version: ProtocolVersion::default(),
            wake: true,
        }
    }
}
