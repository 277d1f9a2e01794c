use crate::buffer::Buffer;
use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};

const READ_BUF_SIZE: usize = 65536;
const WRITE_BUF_SIZE: usize = 65536;

/// A blocking, reliable byte-stream channel. Carries no framing of its own:
/// the stream is a continuous sequence of message bodies, each one
/// self-delimiting via its own tag and internal length prefixes. Callers
/// decode/encode messages directly against a channel through `Read`/`Write`.
pub struct ReliableChannel {
    stream: TcpStream,
    read_buf: Buffer,
    write_buf: Buffer,
}

impl ReliableChannel {
    fn from_stream(stream: TcpStream) -> io::Result<ReliableChannel> {
        stream.set_nodelay(true)?;
        Ok(ReliableChannel {
            stream,
            read_buf: Buffer::new(READ_BUF_SIZE),
            write_buf: Buffer::new(WRITE_BUF_SIZE),
        })
    }

    /// Wraps an already-accepted connection.
    pub fn from_accepted(stream: TcpStream) -> io::Result<ReliableChannel> {
        Self::from_stream(stream)
    }

    /// Dials out to a remote endpoint.
    pub fn dial<A: ToSocketAddrs>(addr: A) -> io::Result<ReliableChannel> {
        let stream = TcpStream::connect(addr)?;
        Self::from_stream(stream)
    }

    pub fn peer_name(&self) -> io::Result<String> {
        Ok(self.stream.peer_addr()?.to_string())
    }

    /// Clones the underlying socket so reads and writes can proceed from
    /// independent reader/writer threads without sharing a buffer.
    pub fn try_clone(&self) -> io::Result<ReliableChannel> {
        let stream = self.stream.try_clone()?;
        Ok(ReliableChannel {
            stream,
            read_buf: Buffer::new(READ_BUF_SIZE),
            write_buf: Buffer::new(WRITE_BUF_SIZE),
        })
    }
}

impl Read for ReliableChannel {
    /// Blocks until at least one byte has arrived, then hands back whatever
    /// is already buffered. Decoders that need an exact count get it for
    /// free from `Read::read_exact`'s retry loop.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_buf.fill_at_least(1, &mut self.stream)?;
        let available = self.read_buf.len().min(buf.len());
        let bytes = self.read_buf.take(available);
        buf[..available].copy_from_slice(&bytes);
        Ok(available)
    }
}

impl Write for ReliableChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_buf.extend(buf);
        Ok(buf.len())
    }

    /// Blocks until every buffered byte has been accepted by the kernel.
    /// There is no frame boundary to do this automatically, so callers must
    /// flush after encoding each outbound message.
    fn flush(&mut self) -> io::Result<()> {
        self.write_buf.egress(&mut self.stream)?;
        Ok(())
    }
}

/// Binds a dual-stack-capable listener for the server's connection acceptor.
pub fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<TcpListener> {
    TcpListener::bind(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_write_read_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = thread::spawn(move || {
            let mut channel = ReliableChannel::dial(addr).unwrap();
            channel.write_all(b"hello channel").unwrap();
            channel.flush().unwrap();
        });

        let (stream, _) = listener.accept().unwrap();
        let mut server_channel = ReliableChannel::from_accepted(stream).unwrap();
        let mut body = [0u8; 13];
        server_channel.read_exact(&mut body).unwrap();

        assert_eq!(&body, b"hello channel");
        client.join().unwrap();
    }

    #[test]
    fn test_read_reports_peer_close_mid_message() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = thread::spawn(move || {
            let mut channel = ReliableChannel::dial(addr).unwrap();
            channel.write_all(&[1, 2, 3]).unwrap();
            channel.flush().unwrap();
            // drop without sending the rest of the expected bytes
        });

        let (stream, _) = listener.accept().unwrap();
        let mut server_channel = ReliableChannel::from_accepted(stream).unwrap();
        let mut body = [0u8; 10];
        let err = server_channel.read_exact(&mut body).unwrap_err();

        client.join().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
