use crate::state::{ClientState, Phase};
use crate::view::{GameView, LobbyView, RoundInfo};
use std::sync::Arc;
use wireframe::channel::ReliableChannel;
use wireframe::datagram::DatagramSender;
use wireframe::error::ErrorType;
use wireframe::messages::ServerMessage;
use wireframe::NetworkError;

fn recv(channel: &mut ReliableChannel) -> Result<ServerMessage, NetworkError> {
    loop {
        match ServerMessage::decode(channel) {
            Err(NetworkError::Wait) => continue,
            other => return other,
        }
    }
}

/// A framing violation means the peer is no longer speaking the same wire
/// protocol at all, not merely that the connection dropped — two
/// independent implementations that disagree on tags, lengths, or string
/// bounds cannot interoperate, so this aborts the process outright rather
/// than limping on as a silently dead task. A plain I/O error (the peer
/// closing the socket) just falls through and ends this task normally.
fn handle_recv_error(err: NetworkError) {
    match err {
        NetworkError::Fatal(ErrorType::Io(_)) => {}
        NetworkError::Fatal(
            ErrorType::UnknownTag(_)
            | ErrorType::TrailingBytes(_)
            | ErrorType::OutOfRange
            | ErrorType::StringTooLong(_)
            | ErrorType::CollectionTooLarge(_),
        ) => std::process::abort(),
        NetworkError::Wait => unreachable!("recv retries Wait internally"),
    }
}

/// Tracks the server's view of the round and mirrors it to the front-end.
/// Alternates between a lobby phase (waiting on `AcceptedPlayer`/
/// `GameStarted`) and a game phase (applying `Turn`s until `GameEnded`),
/// looping back to a fresh lobby once a round finishes.
pub fn run(mut server: ReliableChannel, mut sender: DatagramSender, state: Arc<ClientState>) {
    let hello = match recv(&mut server) {
        Ok(message) => message,
        Err(err) => {
            handle_recv_error(err);
            return;
        }
    };
    let info = RoundInfo::from_hello(&hello);

    loop {
        let mut lobby_view = LobbyView::new(info.clone());
        let _ = sender.send_message(|buf| lobby_view.to_datagram().encode(buf));

        let players = loop {
            match recv(&mut server) {
                Ok(ServerMessage::AcceptedPlayer { player_id, player }) => {
                    lobby_view.accept(player_id, player);
                    let _ = sender.send_message(|buf| lobby_view.to_datagram().encode(buf));
                }
                Ok(ServerMessage::GameStarted { players }) => break Some(players),
                Ok(_) => {}
                Err(err) => {
                    handle_recv_error(err);
                    break None;
                }
            }
        };

        let players = match players {
            Some(players) => players,
            None => return,
        };

        state.set_phase(Phase::Game);
        let mut game_view = GameView::new(info.clone(), players);
        let _ = sender.send_message(|buf| game_view.to_datagram().encode(buf));

        let finished = loop {
            match recv(&mut server) {
                Ok(ServerMessage::Turn { turn, events }) => {
                    game_view.apply_turn(turn, &events);
                    let _ = sender.send_message(|buf| game_view.to_datagram().encode(buf));
                }
                Ok(ServerMessage::GameEnded { .. }) => break true,
                Ok(_) => {}
                Err(err) => {
                    handle_recv_error(err);
                    break false;
                }
            }
        };

        if !finished {
            return;
        }

        state.set_phase(Phase::Lobby);
        state.reset_join_sent();
    }
}
