use std::io::{ErrorKind, Write};

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::codec::FrameConfig;
use crate::constants::{WAKE, WAKE_PREAMBLE_LEN};
use crate::error::Result;
use crate::frame::Frame;

/// Serialize `frame`, optionally behind the wake-up preamble.
pub fn encode_outbound(frame: &Frame, wake: bool) -> Result<Bytes> {
    let body = frame.dump()?;
    if !wake {
        return Ok(body);
    }
    let mut dst = BytesMut::with_capacity(WAKE_PREAMBLE_LEN + body.len());
    dst.put_bytes(WAKE, WAKE_PREAMBLE_LEN);
    dst.put_slice(&body);
    Ok(dst.freeze())
}

/// Writes complete frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let bytes = encode_outbound(frame, self.config.wake)?;
        self.send_raw(&bytes)
    }

    /// Write pre-encoded bytes, such as the discovery request, then flush.
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(std::io::Error::from(ErrorKind::WriteZero).into()),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(err.into()),
            }
        }
        debug!(len = bytes.len(), "frame written");

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Enable or disable the wake-up preamble for subsequent frames.
    pub fn set_wake(&mut self, wake: bool) {
        self.config.wake = wake;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::Address;
    use crate::constants::DISCOVERY_REQUEST;
    use crate::error::FrameError;
    use crate::function::{Function, ProtocolVersion};
    use crate::reader::FrameReader;

    fn station() -> Option<Address> {
        Some("001122334455".parse().unwrap())
    }

    #[test]
    fn encode_with_and_without_preamble() {
        let frame = Frame::read_data(station(), "00000000");
        let body = frame.dump().unwrap();

        let plain = encode_outbound(&frame, false).unwrap();
        assert_eq!(plain, body);

        let woken = encode_outbound(&frame, true).unwrap();
        assert_eq!(&woken[..WAKE_PREAMBLE_LEN], &[0xfe, 0xfe, 0xfe, 0xfe]);
        assert_eq!(&woken[WAKE_PREAMBLE_LEN..], body.as_ref());
    }

    #[test]
    fn discovery_request_matches_encoded_broadcast() {
        let frame =
            Frame::request(None, ProtocolVersion::Dlt645_2007, Function::ReadAddress).unwrap();
        let encoded = encode_outbound(&frame, true).unwrap();
        assert_eq!(encoded.as_ref(), &DISCOVERY_REQUEST);
    }

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let frame = Frame::read_data(station(), "00000000");

        writer.write_frame(&frame).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire.len(), WAKE_PREAMBLE_LEN + frame.wire_size());
        let mut reader = FrameReader::new(Cursor::new(wire));
        let decoded = reader.read_frame().unwrap();
        assert_eq!(decoded.address, frame.address);
        assert_eq!(decoded.data, frame.data);
    }

    #[test]
    fn wake_can_be_disabled() {
        let config = FrameConfig {
            wake: false,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), config);
        let frame = Frame::new(station());
        writer.write_frame(&frame).unwrap();
        assert!(!writer.config().wake);

        writer.set_wake(true);
        writer.write_frame(&frame).unwrap();

        let wire = writer.into_inner().into_inner();
        let body = frame.dump().unwrap();
        assert_eq!(&wire[..body.len()], body.as_ref());
        assert_eq!(&wire[body.len()..body.len() + 4], &[WAKE; 4]);
    }

    #[test]
    fn malformed_frame_is_not_written() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let frame = Frame::read_data(station(), "0");
        assert!(matches!(
            writer.write_frame(&frame),
            Err(FrameError::InvalidData(_))
        ));
        assert!(writer.into_inner().into_inner().is_empty());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = FrameWriter::new(sink);

        writer.send_raw(&DISCOVERY_REQUEST).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let mut writer = FrameWriter::new(InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        });
        writer.write_frame(&Frame::new(None)).unwrap();

        let inner = writer.into_inner();
        assert_eq!(inner.data.len(), WAKE_PREAMBLE_LEN + Frame::new(None).wire_size());
    }

    #[test]
    fn write_zero_is_an_error() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.write_frame(&Frame::new(None)).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WriteZero));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
