use std::io::{ErrorKind, Read};

use bytes::{BufMut, BytesMut};
use tracing::{trace, warn};

use crate::codec::FrameConfig;
use crate::constants::{END, MAX_FRAME_LEN, MIN_FRAME_LEN, WAKE};
use crate::error::{FrameError, Result};
use crate::frame::Frame;
use crate::function::ProtocolVersion;

/// Outcome of asking a byte source for its next byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// A byte arrived.
    Byte(u8),
    /// Nothing arrived: the stream ended or its read timeout elapsed.
    Idle,
}

/// A source of individually arriving bytes.
pub trait ByteSource {
    /// Next byte, or [`Received::Idle`] when none is available.
    fn next_byte(&mut self) -> Result<Received>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> Result<Received> {
        (**self).next_byte()
    }
}

/// Adapts any `Read` stream into a [`ByteSource`].
///
/// End of stream, `TimedOut` and `WouldBlock` all mean "no byte now";
/// `Interrupted` reads are retried.
#[derive(Debug)]
pub struct IoBytes<R> {
    inner: R,
}

impl<R: Read> IoBytes<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoBytes<R> {
    fn next_byte(&mut self) -> Result<Received> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(Received::Idle),
                Ok(_) => return Ok(Received::Byte(byte[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) =>
                {
                    return Ok(Received::Idle)
                }
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }
}

/// Adapts an iterator of [`Received`] outcomes into a [`ByteSource`].
///
/// An exhausted iterator reads as [`Received::Idle`].
#[derive(Debug)]
pub struct IterBytes<I> {
    inner: I,
}

impl<I: Iterator<Item = Received>> IterBytes<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: Iterator<Item = Received>> ByteSource for IterBytes<I> {
    fn next_byte(&mut self) -> Result<Received> {
        Ok(self.inner.next().unwrap_or(Received::Idle))
    }
}

/// Read one frame from `source`.
///
/// Wake-up bytes are dropped wherever they appear. Bytes accumulate until an
/// end marker arrives, then the buffer is validated by [`Frame::load`].
/// Going idle first fails with [`FrameError::Timeout`]; buffering
/// [`MAX_FRAME_LEN`] bytes without an end marker fails with
/// [`FrameError::Structure`].
pub fn read_frame<S: ByteSource>(source: &mut S, version: ProtocolVersion) -> Result<Frame> {
    let mut buf = BytesMut::with_capacity(MIN_FRAME_LEN);
    loop {
        let byte = match source.next_byte()? {
            Received::Byte(byte) => byte,
            Received::Idle => {
                trace!(buffered = buf.len(), "byte source idle before end of frame");
                return Err(FrameError::Timeout);
            }
        };

        if byte == WAKE {
            trace!(buffered = buf.len(), "discarding wake byte");
            continue;
        }

        buf.put_u8(byte);

        if byte == END {
            return Frame::load_with_version(&buf, version);
        }

        if buf.len() >= MAX_FRAME_LEN {
            warn!(buffered = buf.len(), "no end marker within a maximum-size frame");
            return Err(FrameError::structure(&buf));
        }
    }
}

/// Reads complete frames from any `Read` stream, one byte at a time.
pub struct FrameReader<T> {
    inner: IoBytes<T>,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner: IoBytes::new(inner),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::Timeout)` when the stream goes quiet mid-frame.
    pub fn read_frame(&mut self) -> Result<Frame> {
        read_frame(&mut self.inner, self.config.version)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
