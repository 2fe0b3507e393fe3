//! Length-prefixed framing over a reliable ordered byte stream.

use std::io::{self, Read, Write};

/// Errors surfaced by the framed transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer closed the stream mid-protocol.
    #[error("transport closed")]
    Closed,
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A frame length that cannot occur in the protocol.
    #[error("frame of {0} bytes exceeds the protocol maximum")]
    FrameTooLarge(usize),
}

/// The largest legitimate frame is an RSA modulus; anything bigger than this
/// is a corrupted or hostile length prefix.
const MAX_FRAME_LEN: usize = 64 * 1024;

/// A framed channel over a byte stream.
///
/// Integers are 4 bytes big-endian; byte frames carry a `u32` length prefix
/// and may be empty. Every send is matched by exactly one receive on the
/// peer; a stream that ends mid-frame surfaces as [`TransportError::Closed`].
#[derive(Debug)]
pub struct Channel<R, W> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> Channel<R, W> {
    /// Creates a new channel over a reader/writer pair.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Writes a big-endian integer.
    pub fn send_u32(&mut self, value: u32) -> Result<(), TransportError> {
        self.writer
            .write_all(&value.to_be_bytes())
            .map_err(into_transport_error)
    }

    /// Reads a big-endian integer.
    pub fn recv_u32(&mut self) -> Result<u32, TransportError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Writes a length-prefixed byte frame.
    pub fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if bytes.len() > MAX_FRAME_LEN {
            return Err(TransportError::FrameTooLarge(bytes.len()));
        }
        self.send_u32(bytes.len() as u32)?;
        self.writer.write_all(bytes).map_err(into_transport_error)
    }

    /// Reads a length-prefixed byte frame.
    pub fn recv_bytes(&mut self) -> Result<Vec<u8>, TransportError> {
        let len = self.recv_u32()? as usize;
        if len > MAX_FRAME_LEN {
            return Err(TransportError::FrameTooLarge(len));
        }
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Flushes buffered writes to the peer.
    pub fn flush(&mut self) -> Result<(), TransportError> {
        self.writer.flush().map_err(into_transport_error)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        self.reader.read_exact(buf).map_err(into_transport_error)
    }
}

fn into_transport_error(err: io::Error) -> TransportError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::WriteZero => TransportError::Closed,
        _ => TransportError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn receiver(buf: Vec<u8>) -> Channel<Cursor<Vec<u8>>, io::Sink> {
        Channel::new(Cursor::new(buf), io::sink())
    }

    #[test]
    fn test_u32_round_trip() {
        let mut buf = Vec::new();
        let mut tx = Channel::new(io::empty(), &mut buf);
        tx.send_u32(0).unwrap();
        tx.send_u32(0xdead_beef).unwrap();

        let mut rx = receiver(buf);
        assert_eq!(rx.recv_u32().unwrap(), 0);
        assert_eq!(rx.recv_u32().unwrap(), 0xdead_beef);
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut buf = Vec::new();
        let mut tx = Channel::new(io::empty(), &mut buf);
        tx.send_bytes(b"label").unwrap();
        tx.send_bytes(b"").unwrap();
        tx.send_bytes(&[0xffu8; 16]).unwrap();

        let mut rx = receiver(buf);
        assert_eq!(rx.recv_bytes().unwrap(), b"label");
        assert_eq!(rx.recv_bytes().unwrap(), b"");
        assert_eq!(rx.recv_bytes().unwrap(), vec![0xffu8; 16]);
    }

    #[test]
    fn test_closed_mid_frame() {
        // A length prefix with no payload behind it.
        let mut buf = Vec::new();
        let mut tx = Channel::new(io::empty(), &mut buf);
        tx.send_u32(8).unwrap();

        let mut rx = receiver(buf);
        assert!(matches!(
            rx.recv_bytes().unwrap_err(),
            TransportError::Closed
        ));
    }

    #[test]
    fn test_closed_on_eof() {
        let mut rx = receiver(Vec::new());
        assert!(matches!(rx.recv_u32().unwrap_err(), TransportError::Closed));
    }

    #[test]
    fn test_impossible_frame_length() {
        let mut buf = Vec::new();
        let mut tx = Channel::new(io::empty(), &mut buf);
        tx.send_u32(u32::MAX).unwrap();

        let mut rx = receiver(buf);
        assert!(matches!(
            rx.recv_bytes().unwrap_err(),
            TransportError::FrameTooLarge(_)
        ));
    }
}
