//! Request/response helpers for DL/T645 stations.
//!
//! A [`Station`] pairs a frame reader and writer over one serial line and
//! offers the common exchanges: discovering the address of the single meter
//! on a bus and reading its active energy register.

pub mod error;
pub mod station;

pub use error::{Result, StationError};
pub use station::{
    connect, parse_energy, Station, StationConfig, ACTIVE_ENERGY_ID, IDENTIFIER_HEX_LEN,
};
