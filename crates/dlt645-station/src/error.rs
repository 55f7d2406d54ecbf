/// Errors that can occur in station operations.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] dlt645_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] dlt645_frame::FrameError),

    /// The reply did not carry a station address.
    #[error("reply carried no station address")]
    MissingAddress,

    /// The reply answered a different data identifier.
    #[error("reply identifier {actual:?} does not match request {expected:?}")]
    UnexpectedIdentifier { expected: String, actual: String },

    /// The reply value is not a decimal reading.
    #[error("invalid reading {0:?}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, StationError>;
