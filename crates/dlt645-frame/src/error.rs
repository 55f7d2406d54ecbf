use bytes::Bytes;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Start/end markers are missing or misplaced.
    #[error("malformed frame structure ({})", hex_dump(.buffer))]
    Structure { buffer: Bytes },

    /// The trailing checksum byte does not match the frame contents.
    #[error("checksum mismatch (expected {expected:#04x}, found {actual:#04x}) in frame ({})", hex_dump(.buffer))]
    Checksum {
        expected: u8,
        actual: u8,
        buffer: Bytes,
    },

    /// The byte source went idle before a complete frame was received.
    #[error("timed out waiting for end of frame")]
    Timeout,

    /// A station address is not exactly 12 hex digits.
    #[error("invalid station address {0:?} (expected 12 hex digits)")]
    InvalidAddress(String),

    /// A data payload is not an even-length hex string.
    #[error("invalid data payload {0:?} (expected even-length hex)")]
    InvalidData(String),

    /// The data payload does not fit the one-byte length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    pub(crate) fn structure(buffer: &[u8]) -> Self {
        Self::Structure {
            buffer: Bytes::copy_from_slice(buffer),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Space separated lowercase hex, as frames are usually written in meter docs.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_dump_spaces_bytes() {
        assert_eq!(hex_dump(&[0x68, 0x0a, 0x16]), "68 0a 16");
        assert_eq!(hex_dump(&[]), "");
    }

    #[test]
    fn structure_error_shows_buffer() {
        let err = FrameError::structure(&[0x68, 0x16]);
        assert_eq!(err.to_string(), "malformed frame structure (68 16)");
    }
}
