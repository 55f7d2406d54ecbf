//! Serial transport for DL/T645 meters.
//!
//! Opens a serial port with the line settings meters expect (1200 baud,
//! 8 data bits, even parity, 1 stop bit by default) and exposes it as a
//! blocking [`MeterStream`] that the frame layer reads and writes.

pub mod config;
pub mod error;
pub mod stream;

pub use config::{parse_duration, Parity, SerialConfig};
pub use error::{Result, TransportError};
pub use stream::{available_ports, open, MeterStream};
