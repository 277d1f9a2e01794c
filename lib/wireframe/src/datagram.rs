use crate::error::{ErrorType, NetworkError};
use std::io::{self, Cursor};
use std::net::{ToSocketAddrs, UdpSocket};

const SCRATCH_SIZE: usize = 65536;

/// The receiving half of a datagram channel: one bound socket plus a
/// receive scratch buffer, reused across packets.
pub struct DatagramReceiver {
    socket: UdpSocket,
    buf: Vec<u8>,
}

/// The sending half: one socket connected to a single fixed peer plus a
/// send scratch buffer built up by `encode` before each flush.
pub struct DatagramSender {
    socket: UdpSocket,
    buf: Vec<u8>,
}

/// Binds a receive socket on `bind_addr` and a send socket connected to
/// `remote_addr`, split so the two directions can live on independent
/// threads without sharing a buffer.
pub fn channel_pair<A, B>(bind_addr: A, remote_addr: B) -> io::Result<(DatagramReceiver, DatagramSender)>
where
    A: ToSocketAddrs,
    B: ToSocketAddrs,
{
    let recv_socket = UdpSocket::bind(bind_addr)?;
    let send_socket = UdpSocket::bind("0.0.0.0:0")?;
    send_socket.connect(remote_addr)?;

    Ok((
        DatagramReceiver { socket: recv_socket, buf: vec![0u8; SCRATCH_SIZE] },
        DatagramSender { socket: send_socket, buf: Vec::with_capacity(SCRATCH_SIZE) },
    ))
}

impl DatagramReceiver {
    /// Blocks for the next datagram and decodes it with `decode`. Rejects
    /// any packet with bytes left over once `decode` has consumed a full
    /// message.
    pub fn recv_message<T>(
        &mut self,
        decode: impl FnOnce(&mut Cursor<&[u8]>) -> Result<T, NetworkError>,
    ) -> Result<T, NetworkError> {
        let len = self.socket.recv(&mut self.buf)?;
        let mut cursor = Cursor::new(&self.buf[..len]);
        let message = decode(&mut cursor)?;

        let trailing = len - cursor.position() as usize;
        if trailing > 0 {
            return Err(NetworkError::Fatal(ErrorType::TrailingBytes(trailing)));
        }

        Ok(message)
    }
}

impl DatagramSender {
    /// Encodes a message into one outbound packet and sends it immediately.
    pub fn send_message(
        &mut self,
        encode: impl FnOnce(&mut Vec<u8>) -> Result<(), NetworkError>,
    ) -> Result<(), NetworkError> {
        self.buf.clear();
        encode(&mut self.buf)?;

        if self.buf.len() > SCRATCH_SIZE {
            return Err(NetworkError::Fatal(ErrorType::CollectionTooLarge(self.buf.len())));
        }

        self.socket.send(&self.buf)?;
        Ok(())
    }
}
