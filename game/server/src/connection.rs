use crate::shared::SharedState;
use gamecore::RoundConfig;
use slog::{debug, info, warn, Logger};
use std::io::Write;
use std::sync::Arc;
use wireframe::channel::ReliableChannel;
use wireframe::error::{ErrorType, NetworkError};
use wireframe::messages::{ClientMessage, PlayerId, Player, ServerMessage};

fn send(channel: &mut ReliableChannel, message: &ServerMessage) -> Result<(), NetworkError> {
    message.encode(channel)?;
    channel.flush()?;
    Ok(())
}

/// Reads client messages off one connection for as long as it stays open,
/// routing `Join` into the lobby and in-round commands into the move
/// collector. Re-reads the shared round version on every message so a
/// client that survives across a round boundary re-joins the next one.
pub fn reader_task(mut channel: ReliableChannel, shared: Arc<SharedState>, log: Logger) {
    let mut last_version: Option<u64> = None;
    let mut joined = false;
    let mut player_id: Option<PlayerId> = None;

    loop {
        let message = match ClientMessage::decode(&mut channel) {
            Ok(message) => message,
            Err(NetworkError::Fatal(ErrorType::Io(_))) => {
                debug!(log, "connection closed");
                return;
            }
            Err(NetworkError::Wait) => continue,
            Err(_) => {
                warn!(log, "dropping malformed client message");
                return;
            }
        };

        let (handles, version, started) = shared.snapshot();
        if last_version != Some(version) {
            joined = false;
            player_id = None;
            last_version = Some(version);
        }

        match message {
            ClientMessage::Join { name } => {
                if joined {
                    continue;
                }
                let address = match channel.peer_name() {
                    Ok(address) => address,
                    Err(_) => return,
                };
                match handles.lobby.add(Player { name, address }) {
                    Ok(id) => {
                        info!(log, "player joined"; "player_id" => id);
                        player_id = Some(id);
                        joined = true;
                    }
                    Err(_) => warn!(log, "rejected join: lobby full"),
                }
            }
            ClientMessage::PlaceBomb | ClientMessage::PlaceBlock | ClientMessage::Move { .. } => {
                if joined && started {
                    if let Some(id) = player_id {
                        let _ = handles.moves.update(id, message);
                    }
                }
            }
        }
    }
}

/// Streams the per-round notification sequence to one connection, forever:
/// `Hello` once, then for every round `AcceptedPlayer*`, `GameStarted`,
/// `Turn*`, `GameEnded`.
pub fn writer_task(mut channel: ReliableChannel, shared: Arc<SharedState>, config: RoundConfig, log: Logger) {
    let hello = ServerMessage::Hello {
        server_name: config.server_name.clone(),
        players_count: config.players_count,
        size_x: config.size_x,
        size_y: config.size_y,
        game_length: config.game_length,
        explosion_radius: config.explosion_radius,
        bomb_timer: config.bomb_timer,
    };
    if send(&mut channel, &hello).is_err() {
        return;
    }

    loop {
        let (handles, _, _) = shared.snapshot();

        for id in 0..config.players_count {
            let player = handles
                .lobby
                .get(id)
                .expect("id is within the configured lobby capacity");
            let message = ServerMessage::AcceptedPlayer { player_id: id, player };
            if send(&mut channel, &message).is_err() {
                return;
            }
        }

        let roster = handles.lobby.wait_full();
        if send(&mut channel, &ServerMessage::GameStarted { players: roster }).is_err() {
            return;
        }

        for index in 0..=config.game_length {
            let record = handles.turn_log.get(index as usize);
            let message = ServerMessage::Turn { turn: record.turn, events: record.events };
            if send(&mut channel, &message).is_err() {
                return;
            }
        }

        let scores = handles.turn_log.wait_finished();
        if send(&mut channel, &ServerMessage::GameEnded { scores }).is_err() {
            return;
        }
    }
}
