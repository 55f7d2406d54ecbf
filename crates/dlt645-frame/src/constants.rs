//! Fixed protocol bytes.
//!
//! Every frame is bracketed by [`START`] markers around the address and
//! closed by [`END`]. [`WAKE`] bytes may precede (or interleave) a frame on
//! the bus and never count towards the checksum.

/// Frame-start marker, found at offsets 0 and 7.
pub const START: u8 = 0x68;

/// Frame-end marker, always the last byte.
pub const END: u8 = 0x16;

/// Wake-up byte sent ahead of a frame to rouse a listening meter.
pub const WAKE: u8 = 0xFE;

/// Number of wake-up bytes prefixed to outbound frames.
pub const WAKE_PREAMBLE_LEN: usize = 4;

/// Station address length on the wire.
pub const ADDRESS_LEN: usize = 6;

/// Address addressing every station on the bus.
pub const BROADCAST_ADDRESS: [u8; ADDRESS_LEN] = [0xAA; ADDRESS_LEN];

/// Offset added to every data byte on the wire.
pub const DATA_BIAS: u8 = 0x33;

/// Largest data payload the one-byte length field can describe.
pub const MAX_DATA_LEN: usize = u8::MAX as usize;

/// Offset of the second start marker.
pub const SECOND_START_OFFSET: usize = 7;

/// Offset of the control byte.
pub const CONTROL_OFFSET: usize = 8;

/// Offset of the data length byte.
pub const LENGTH_OFFSET: usize = 9;

/// Offset of the first data byte.
pub const DATA_OFFSET: usize = 10;

/// Smallest well-formed frame: header, length, checksum and end marker.
pub const MIN_FRAME_LEN: usize = DATA_OFFSET + 2;

/// Largest well-formed frame, carrying a full data payload.
pub const MAX_FRAME_LEN: usize = MIN_FRAME_LEN + MAX_DATA_LEN;

/// Request asking an unknown station for its address (broadcast, READ_ADDR).
pub const DISCOVERY_REQUEST: [u8; 16] = [
    WAKE, WAKE, WAKE, WAKE, START, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, START, 0x13, 0x00, 0xDF,
    END,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_request_bytes() {
        assert_eq!(
            DISCOVERY_REQUEST,
            [
                0xfe, 0xfe, 0xfe, 0xfe, 0x68, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0x68, 0x13, 0x00,
                0xdf, 0x16
            ]
        );
    }

    #[test]
    fn discovery_checksum_covers_frame_only() {
        let frame = &DISCOVERY_REQUEST[WAKE_PREAMBLE_LEN..];
        let sum = frame[..frame.len() - 2]
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(sum, frame[frame.len() - 2]);
    }
}
