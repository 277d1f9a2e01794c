use crate::state::{ClientState, Phase};
use slog::{debug, Logger};
use std::io::Write;
use std::sync::Arc;
use wireframe::channel::ReliableChannel;
use wireframe::datagram::DatagramReceiver;
use wireframe::messages::{ClientMessage, FrontEndMessage};
use wireframe::NetworkError;

fn send(channel: &mut ReliableChannel, message: &ClientMessage) -> Result<(), NetworkError> {
    message.encode(channel)?;
    channel.flush()?;
    Ok(())
}

/// Forwards front-end input to the server. Any datagram that fails to
/// decode is dropped rather than tearing down the connection.
pub fn run(
    mut receiver: DatagramReceiver,
    mut server: ReliableChannel,
    state: Arc<ClientState>,
    player_name: String,
    log: Logger,
) {
    loop {
        let message = match receiver.recv_message(|cursor| FrontEndMessage::decode(cursor)) {
            Ok(message) => message,
            Err(_) => {
                debug!(log, "dropped invalid front-end datagram");
                continue;
            }
        };

        if state.phase() == Phase::Lobby && !state.take_join_sent() {
            let join = ClientMessage::Join { name: player_name.clone() };
            if send(&mut server, &join).is_err() {
                return;
            }
        }

        let client_message = match message {
            FrontEndMessage::PlaceBomb => ClientMessage::PlaceBomb,
            FrontEndMessage::PlaceBlock => ClientMessage::PlaceBlock,
            FrontEndMessage::Move { direction } => ClientMessage::Move { direction },
        };

        if send(&mut server, &client_message).is_err() {
            return;
        }
    }
}
