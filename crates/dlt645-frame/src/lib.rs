//! DL/T645 frame codec for serial meter reading.
//!
//! Every frame on the bus is laid out as:
//! - a start marker (0x68), the 6-byte station address (byte-reversed),
//!   and a second start marker
//! - a control byte (direction, response flag, follow-up flag, function code)
//! - a length byte and the biased, byte-reversed data payload
//! - a mod-256 checksum and an end marker (0x16)
//!
//! Wake-up bytes (0xFE) may precede or interleave a frame; the reader drops
//! them and never hands out a partially received frame.

pub mod codec;
pub mod constants;
pub mod error;
pub mod frame;
pub mod function;
pub mod reader;
pub mod writer;

pub use codec::{
    checksum, decode_data, encode_address, encode_data, Address, Control, Direction, FrameConfig,
    Response,
};
pub use constants::{
    BROADCAST_ADDRESS, DATA_BIAS, DISCOVERY_REQUEST, END, MAX_DATA_LEN, MAX_FRAME_LEN,
    MIN_FRAME_LEN, START, WAKE, WAKE_PREAMBLE_LEN,
};
pub use error::{hex_dump, FrameError, Result};
pub use frame::Frame;
pub use function::{Function, ProtocolVersion};
pub use reader::{read_frame, ByteSource, FrameReader, IoBytes, IterBytes, Received};
pub use writer::{encode_outbound, FrameWriter};
