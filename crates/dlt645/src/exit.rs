use std::fmt;
use std::io;

use dlt645_frame::FrameError;
use dlt645_station::StationError;
use dlt645_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::Timeout => CliError::new(TIMEOUT, format!("{context}: {err}")),
        FrameError::Structure { .. } | FrameError::Checksum { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::InvalidAddress(_)
        | FrameError::InvalidData(_)
        | FrameError::PayloadTooLarge { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

pub fn station_error(context: &str, err: StationError) -> CliError {
    match err {
        StationError::Transport(err) => transport_error(context, err),
        StationError::Frame(err) => frame_error(context, err),
        StationError::MissingAddress
        | StationError::UnexpectedIdentifier { .. }
        | StationError::InvalidValue(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_errors_map_to_exit_codes() {
        assert_eq!(frame_error("read", FrameError::Timeout).code, TIMEOUT);
        assert_eq!(
            frame_error("decode", FrameError::InvalidData("1".into())).code,
            USAGE
        );
        assert_eq!(
            frame_error(
                "read",
                FrameError::Io(io::Error::from(io::ErrorKind::PermissionDenied))
            )
            .code,
            PERMISSION_DENIED
        );
    }

    #[test]
    fn station_errors_map_to_exit_codes() {
        let err = station_error("energy", StationError::Frame(FrameError::Timeout));
        assert_eq!(err.code, TIMEOUT);
        assert_eq!(err.message, "energy: timed out waiting for end of frame");

        let err = station_error("addr", StationError::MissingAddress);
        assert_eq!(err.code, DATA_INVALID);

        let err = station_error(
            "open",
            StationError::Transport(TransportError::InvalidConfig("bad".into())),
        );
        assert_eq!(err.code, USAGE);
    }
}
