//! TCP-bridged serial link.
//!
//! Bench implementation of [`HardwareLink`]: the serial-wireless device is
//! exposed as a TCP endpoint (by a bridge process or terminal server) and
//! each read yields one frame. Deployment links only need to implement the
//! same trait.

use std::io::{ErrorKind, Read};
use std::net::TcpStream;
use std::time::Duration;

use homelink_common::{HardwareLink, TransportError};
use tracing::info;

/// A [`HardwareLink`] over one TCP connection to a fixed address.
pub struct TcpSerialBridge {
    address: String,
    stream: Option<TcpStream>,
}

impl TcpSerialBridge {
    /// Create a bridge targeting `host:port`.
    pub fn new(address: impl Into<String>) -> Self {
        TcpSerialBridge {
            address: address.into(),
            stream: None,
        }
    }
}

impl HardwareLink for TcpSerialBridge {
    fn connect(&mut self) -> Result<(), TransportError> {
        let stream = TcpStream::connect(&self.address)
            .map_err(|e| TransportError::Connection(format!("{}: {e}", self.address)))?;
        info!(address = %self.address, "serial bridge connected");
        self.stream = Some(stream);
        Ok(())
    }

    fn recv_frame(
        &mut self,
        max_len: usize,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, TransportError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| TransportError::Connection("link not connected".to_string()))?;
        stream.set_read_timeout(Some(timeout))?;

        let mut frame = vec![0u8; max_len.max(1)];
        match stream.read(&mut frame) {
            Ok(0) => Err(TransportError::Connection("link closed by peer".to_string())),
            Ok(n) => {
                frame.truncate(n);
                Ok(Some(frame))
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn disconnect(&mut self) {
        self.stream = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;

    #[test]
    fn test_reads_one_frame_per_write() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = std::thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            socket.write_all(b"013004045").unwrap();
            socket.flush().unwrap();
            // keep the socket open long enough for the reads below
            std::thread::sleep(Duration::from_millis(200));
        });

        let mut bridge = TcpSerialBridge::new(address);
        bridge.connect().unwrap();

        let frame = bridge
            .recv_frame(9, Duration::from_secs(1))
            .unwrap()
            .expect("frame expected");
        assert_eq!(frame, b"013004045");

        // nothing further: a timeout, not an error
        assert_eq!(bridge.recv_frame(9, Duration::from_millis(20)).unwrap(), None);

        bridge.disconnect();
        server.join().unwrap();
    }

    #[test]
    fn test_connect_failure_is_a_connection_fault() {
        // a port nothing listens on
        let mut bridge = TcpSerialBridge::new("127.0.0.1:1");
        assert!(matches!(bridge.connect(), Err(TransportError::Connection(_))));
    }

    #[test]
    fn test_peer_close_is_a_connection_fault() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = std::thread::spawn(move || {
            let (socket, _) = listener.accept().unwrap();
            drop(socket);
        });

        let mut bridge = TcpSerialBridge::new(address);
        bridge.connect().unwrap();
        server.join().unwrap();

        // reads eventually observe the close as a zero-length read
        let mut saw_fault = false;
        for _ in 0..50 {
            match bridge.recv_frame(9, Duration::from_millis(20)) {
                Err(TransportError::Connection(_)) => {
                    saw_fault = true;
                    break;
                }
                Ok(None) => continue,
                other => panic!("unexpected read result: {other:?}"),
            }
        }
        assert!(saw_fault);
    }
}
