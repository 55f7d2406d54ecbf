//! DL/T645 meter reading over serial lines.
//!
//! # Crate Structure
//!
//! - [`frame`] — Frame codec, wake-byte tolerant reader, writer
//! - [`transport`] — Serial port configuration and stream
//! - [`station`] — Request/response helpers (address discovery, active energy)

/// Re-export frame types.
pub mod frame {
    pub use dlt645_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use dlt645_transport::*;
}

/// Re-export station types.
pub mod station {
    pub use dlt645_station::*;
}
