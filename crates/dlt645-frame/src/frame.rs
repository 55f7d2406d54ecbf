use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::codec::{checksum, decode_data, encode_address, encode_data, to_hex, Address, Control};
use crate::constants::{
    ADDRESS_LEN, CONTROL_OFFSET, DATA_OFFSET, END, LENGTH_OFFSET, MAX_DATA_LEN, MIN_FRAME_LEN,
    SECOND_START_OFFSET, START,
};
use crate::error::{FrameError, Result};
use crate::function::{Function, ProtocolVersion};

/// A DL/T645 frame.
///
/// Outbound frames are built with the constructors below, have their fields
/// assigned, then serialized with [`Frame::dump`]. Inbound frames come out of
/// [`Frame::load`] and keep the exact bytes they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Station address; `None` addresses every station.
    ///
    /// The broadcast address decodes back to `None`, so `Some` of the
    /// broadcast address and `None` are the same frame on the wire.
    pub address: Option<Address>,
    /// Unpacked control byte.
    pub control: Control,
    /// Data payload as an even-length hex string, most-significant byte first.
    pub data: Option<String>,
    /// Revision used to interpret `control.function`.
    pub version: ProtocolVersion,
    raw: Option<Bytes>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::with_version(None, ProtocolVersion::default())
    }
}

impl Frame {
    /// A READ_DATA request to `address` (DL/T645-2007).
    pub fn new(address: Option<Address>) -> Self {
        Self::with_version(address, ProtocolVersion::default())
    }

    /// A READ_DATA request to `address` under `version`.
    pub fn with_version(address: Option<Address>, version: ProtocolVersion) -> Self {
        Self {
            address,
            control: Control::default_for(version),
            data: None,
            version,
            raw: None,
        }
    }

    /// A frame with an explicit control value, interpreted under `version`.
    pub fn with_control(
        address: Option<Address>,
        control: Control,
        version: ProtocolVersion,
    ) -> Self {
        Self {
            control,
            ..Self::with_version(address, version)
        }
    }

    /// A master request for `function`, or `None` if `version` lacks it.
    pub fn request(
        address: Option<Address>,
        version: ProtocolVersion,
        function: Function,
    ) -> Option<Self> {
        Control::request(version, function).map(|control| Self {
            control,
            ..Self::with_version(address, version)
        })
    }

    /// A READ_DATA request carrying a data identifier.
    pub fn read_data(address: Option<Address>, identifier: impl Into<String>) -> Self {
        Self {
            data: Some(identifier.into()),
            ..Self::new(address)
        }
    }

    /// Parse a frame from its wire bytes (without wake bytes).
    pub fn load(raw: &[u8]) -> Result<Self> {
        Self::load_with_version(raw, ProtocolVersion::default())
    }

    /// Parse a frame, interpreting its function code under `version`.
    pub fn load_with_version(raw: &[u8], version: ProtocolVersion) -> Result<Self> {
        if raw.len() < MIN_FRAME_LEN
            || raw[0] != START
            || raw[SECOND_START_OFFSET] != START
            || raw[raw.len() - 1] != END
        {
            warn!(len = raw.len(), "frame structure rejected");
            return Err(FrameError::structure(raw));
        }

        let checksum_offset = raw.len() - 2;
        let expected = checksum(&raw[..checksum_offset]);
        let actual = raw[checksum_offset];
        if expected != actual {
            warn!(expected, actual, "frame checksum rejected");
            return Err(FrameError::Checksum {
                expected,
                actual,
                buffer: Bytes::copy_from_slice(raw),
            });
        }

        let mut wire_address = [0u8; ADDRESS_LEN];
        wire_address.copy_from_slice(&raw[1..1 + ADDRESS_LEN]);
        let address = Some(Address::from_wire(wire_address)).filter(|a| !a.is_broadcast());
        let control = Control::decode(raw[CONTROL_OFFSET]);

        let length = raw[LENGTH_OFFSET] as usize;
        let data_end = DATA_OFFSET + length;
        if data_end > checksum_offset {
            warn!(length, frame_len = raw.len(), "data length overruns frame");
            return Err(FrameError::structure(raw));
        }
        let data = decode_data(&raw[DATA_OFFSET..data_end]);

        debug!(
            ?address,
            control = control.encode(),
            data_len = length,
            "frame loaded"
        );

        Ok(Self {
            address,
            control,
            data: Some(data),
            version,
            raw: Some(Bytes::copy_from_slice(raw)),
        })
    }

    /// Serialize to wire bytes (without wake bytes).
    ///
    /// Wire format:
    /// ```text
    /// ┌──────┬─────────────┬──────┬─────────┬────────┬──────────┬──────────┬──────┐
    /// │ 0x68 │ Address     │ 0x68 │ Control │ Length │ Data     │ Checksum │ 0x16 │
    /// │      │ (6B, rev.)  │      │ (1B)    │ (1B)   │ (N, +33) │ (1B)     │      │
    /// └──────┴─────────────┴──────┴─────────┴────────┴──────────┴──────────┴──────┘
    /// ```
    pub fn dump(&self) -> Result<Bytes> {
        let address = encode_address(self.address.as_ref());
        let data = encode_data(self.data.as_deref())?;
        if data.len() > MAX_DATA_LEN {
            return Err(FrameError::PayloadTooLarge {
                size: data.len(),
                max: MAX_DATA_LEN,
            });
        }

        let mut dst = BytesMut::with_capacity(MIN_FRAME_LEN + data.len());
        dst.put_u8(START);
        dst.put_slice(&address);
        dst.put_u8(START);
        dst.put_u8(self.control.encode());
        dst.put_u8(data.len() as u8);
        dst.put_slice(&data);
        let cs = checksum(&dst);
        dst.put_u8(cs);
        dst.put_u8(END);

        debug!(len = dst.len(), control = self.control.encode(), "frame dumped");
        Ok(dst.freeze())
    }

    /// The bytes this frame was loaded from, if it is an inbound frame.
    pub fn raw(&self) -> Option<&Bytes> {
        self.raw.as_ref()
    }

    /// Checksum recomputed over the loaded bytes.
    pub fn checksum(&self) -> Option<u8> {
        self.raw
            .as_ref()
            .filter(|raw| raw.len() >= 2)
            .map(|raw| checksum(&raw[..raw.len() - 2]))
    }

    /// Whether the loaded bytes carry a matching checksum byte.
    ///
    /// `None` for frames that were never loaded.
    pub fn is_valid(&self) -> Option<bool> {
        let raw = self.raw.as_ref()?;
        let computed = self.checksum()?;
        Some(computed == raw[raw.len() - 2])
    }

    /// Function resolved through this frame's version table.
    pub fn function(&self) -> Option<Function> {
        self.control.function_kind(self.version)
    }

    /// The total wire size of this frame, excluding wake bytes.
    pub fn wire_size(&self) -> usize {
        MIN_FRAME_LEN + self.data.as_ref().map_or(0, |d| d.len() / 2)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.write_str(&to_hex(raw)),
            None => match self.dump() {
                Ok(bytes) => f.write_str(&to_hex(&bytes)),
                Err(_) => f.write_str("<unencodable frame>"),
            },
        }
    }
}
