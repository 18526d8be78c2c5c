//! Serial transport and response framing for the speed sensor
//!
//! Protocol:
//! - 115200 baud, textual commands (`?P`, `?N`, `US`, `R>n\r`)
//! - Steady-state responses are bare signed decimal lines
//! - Configuration responses are one-line structured objects starting
//!   with `{`
//!
//! Framing assumption inherited from the device protocol: a structured
//! response fits within a single 128-byte read and starts at offset 0.
//! Responses are short and the link delivers whole tokens per read, so
//! nothing is reassembled across reads.

use crate::error::BridgeError;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::trace;

/// Fixed read chunk size; device tokens never exceed it
pub const READ_CHUNK: usize = 128;

/// Exclusive handle on the sensor's byte stream.
///
/// Owns the one serial handle for the process lifetime; the port is
/// released on drop at process exit.
pub struct SensorLink<S> {
    stream: S,
}

impl SensorLink<SerialStream> {
    /// Open the serial device at the given baud rate
    pub fn open(device: &str, baud: u32) -> Result<Self, BridgeError> {
        let stream = tokio_serial::new(device, baud).open_native_async()?;
        Ok(Self { stream })
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> SensorLink<S> {
    /// Wrap an already-open byte stream (tests use an in-memory duplex)
    pub fn from_stream(stream: S) -> Self {
        Self { stream }
    }

    /// Write one command verbatim
    pub async fn send(&mut self, cmd: &str) -> Result<(), BridgeError> {
        self.stream.write_all(cmd.as_bytes()).await?;
        Ok(())
    }

    /// One blocked read of up to READ_CHUNK bytes
    async fn read_chunk(&mut self, buf: &mut [u8; READ_CHUNK]) -> Result<usize, BridgeError> {
        let n = self.stream.read(buf).await?;
        if n == 0 {
            // zero-length read means the device side closed
            return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "sensor stream closed").into());
        }
        Ok(n)
    }

    /// Read the most recent reading line.
    ///
    /// The device may emit several buffered lines per read; only the last
    /// non-empty segment is returned, the rest discarded. A stale reading
    /// is useless for a live feed, so staleness loses to buffering.
    /// Returns an empty string when the chunk trims to nothing.
    pub async fn read_line(&mut self) -> Result<String, BridgeError> {
        let mut buf = [0u8; READ_CHUNK];
        let n = self.read_chunk(&mut buf).await?;
        let text = String::from_utf8_lossy(&buf[..n]);
        let line = last_segment(&text);
        trace!(chunk = n, line = %line, "serial_line");
        Ok(line)
    }

    /// Read one structured-text response.
    ///
    /// Chunks whose first byte is not `{` are discarded until one
    /// qualifies; that chunk is returned verbatim.
    pub async fn read_object(&mut self) -> Result<String, BridgeError> {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = self.read_chunk(&mut buf).await?;
            if buf[0] == b'{' {
                return Ok(String::from_utf8_lossy(&buf[..n]).into_owned());
            }
            trace!(discarded = n, "serial_object_skip");
        }
    }
}

/// Last non-empty CR/LF-separated segment of a trimmed chunk
fn last_segment(text: &str) -> String {
    text.trim()
        .split(['\r', '\n'])
        .rev()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_last_segment_single_line() {
        assert_eq!(last_segment("5.3\r\n"), "5.3");
    }

    #[test]
    fn test_last_segment_keeps_only_most_recent() {
        assert_eq!(last_segment("5.3\r\n-2.1\r\n17.0\r\n"), "17.0");
        assert_eq!(last_segment("1.0\r\n\r\n2.0"), "2.0");
    }

    #[test]
    fn test_last_segment_empty_chunk() {
        assert_eq!(last_segment("\r\n"), "");
        assert_eq!(last_segment("   "), "");
    }

    #[tokio::test]
    async fn test_read_line_returns_last_segment() {
        let (mut device, host) = tokio::io::duplex(256);
        let mut link = SensorLink::from_stream(host);

        device.write_all(b"5.3\r\n-2.1\r\n").await.unwrap();
        assert_eq!(link.read_line().await.unwrap(), "-2.1");
    }

    #[tokio::test]
    async fn test_read_object_skips_non_object_chunks() {
        let (mut device, host) = tokio::io::duplex(256);
        let mut link = SensorLink::from_stream(host);

        let reader = tokio::spawn(async move { link.read_object().await });

        device.write_all(b"12.7\r\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        device.write_all(b"{\"Units\" : \"mph\"}").await.unwrap();

        let object = reader.await.unwrap().unwrap();
        assert_eq!(object, "{\"Units\" : \"mph\"}");
    }

    #[tokio::test]
    async fn test_closed_stream_is_an_error() {
        let (device, host) = tokio::io::duplex(256);
        let mut link = SensorLink::from_stream(host);

        drop(device);
        assert!(link.read_line().await.is_err());
    }
}
