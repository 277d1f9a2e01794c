//! The message catalogue: the four dialects spoken across the system's two
//! transports. Every variant here round-trips through `encode`/`decode`
//! losslessly; tag numbers are part of the wire contract and must not be
//! renumbered without bumping every peer at once.

use crate::codec::{read_map, read_seq, read_string, write_map, write_seq, write_string};
use crate::error::{ErrorType, NetworkError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::collections::BTreeMap;
use std::io::{Read, Write};

pub type PlayerId = u8;
pub type BombId = u32;
pub type Coord = u16;
pub type Score = u32;
pub type TurnNumber = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub fn new(x: Coord, y: Coord) -> Position {
        Position { x, y }
    }

    fn read<R: Read>(r: &mut R) -> Result<Position, NetworkError> {
        Ok(Position {
            x: r.read_u16::<BigEndian>()?,
            y: r.read_u16::<BigEndian>()?,
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> Result<(), NetworkError> {
        w.write_u16::<BigEndian>(self.x)?;
        w.write_u16::<BigEndian>(self.y)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub address: String,
}

impl Player {
    fn read<R: Read>(r: &mut R) -> Result<Player, NetworkError> {
        Ok(Player {
            name: read_string(r)?,
            address: read_string(r)?,
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> Result<(), NetworkError> {
        write_string(w, &self.name)?;
        write_string(w, &self.address)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bomb {
    pub position: Position,
    pub timer: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// (dx, dy) offset this direction moves a position by.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    fn from_tag(tag: u8) -> Result<Direction, NetworkError> {
        match tag {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Right),
            2 => Ok(Direction::Down),
            3 => Ok(Direction::Left),
            _ => Err(NetworkError::Fatal(ErrorType::UnknownTag(tag))),
        }
    }

    fn read<R: Read>(r: &mut R) -> Result<Direction, NetworkError> {
        Direction::from_tag(r.read_u8()?)
    }

    fn write<W: Write>(&self, w: &mut W) -> Result<(), NetworkError> {
        Ok(w.write_u8(*self as u8)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    BombPlaced {
        bomb_id: BombId,
        position: Position,
    },
    BombExploded {
        bomb_id: BombId,
        destroyed_players: Vec<PlayerId>,
        destroyed_blocks: Vec<Position>,
    },
    PlayerMoved {
        player_id: PlayerId,
        position: Position,
    },
    BlockPlaced {
        position: Position,
    },
}

impl Event {
    fn tag(&self) -> u8 {
        match self {
            Event::BombPlaced { .. } => 0,
            Event::BombExploded { .. } => 1,
            Event::PlayerMoved { .. } => 2,
            Event::BlockPlaced { .. } => 3,
        }
    }

    fn read<R: Read>(r: &mut R) -> Result<Event, NetworkError> {
        let tag = r.read_u8()?;
        Ok(match tag {
            0 => Event::BombPlaced {
                bomb_id: r.read_u32::<BigEndian>()?,
                position: Position::read(r)?,
            },
            1 => Event::BombExploded {
                bomb_id: r.read_u32::<BigEndian>()?,
                destroyed_players: read_seq(r, |r| Ok(r.read_u8()?))?,
                destroyed_blocks: read_seq(r, Position::read)?,
            },
            2 => Event::PlayerMoved {
                player_id: r.read_u8()?,
                position: Position::read(r)?,
            },
            3 => Event::BlockPlaced {
                position: Position::read(r)?,
            },
            _ => return Err(NetworkError::Fatal(ErrorType::UnknownTag(tag))),
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> Result<(), NetworkError> {
        w.write_u8(self.tag())?;
        match self {
            Event::BombPlaced { bomb_id, position } => {
                w.write_u32::<BigEndian>(*bomb_id)?;
                position.write(w)?;
            }
            Event::BombExploded {
                bomb_id,
                destroyed_players,
                destroyed_blocks,
            } => {
                w.write_u32::<BigEndian>(*bomb_id)?;
                write_seq(w, destroyed_players, |w, id| Ok(w.write_u8(*id)?))?;
                write_seq(w, destroyed_blocks, |w, p| p.write(w))?;
            }
            Event::PlayerMoved { player_id, position } => {
                w.write_u8(*player_id)?;
                position.write(w)?;
            }
            Event::BlockPlaced { position } => position.write(w)?,
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    Join { name: String },
    PlaceBomb,
    PlaceBlock,
    Move { direction: Direction },
}

impl ClientMessage {
    pub fn decode<R: Read>(r: &mut R) -> Result<ClientMessage, NetworkError> {
        let tag = r.read_u8()?;
        Ok(match tag {
            0 => ClientMessage::Join { name: read_string(r)? },
            1 => ClientMessage::PlaceBomb,
            2 => ClientMessage::PlaceBlock,
            3 => ClientMessage::Move { direction: Direction::read(r)? },
            _ => return Err(NetworkError::Fatal(ErrorType::UnknownTag(tag))),
        })
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), NetworkError> {
        match self {
            ClientMessage::Join { name } => {
                w.write_u8(0)?;
                write_string(w, name)?;
            }
            ClientMessage::PlaceBomb => w.write_u8(1)?,
            ClientMessage::PlaceBlock => w.write_u8(2)?,
            ClientMessage::Move { direction } => {
                w.write_u8(3)?;
                direction.write(w)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    Hello {
        server_name: String,
        players_count: PlayerId,
        size_x: Coord,
        size_y: Coord,
        game_length: TurnNumber,
        explosion_radius: u16,
        bomb_timer: u16,
    },
    AcceptedPlayer {
        player_id: PlayerId,
        player: Player,
    },
    GameStarted {
        players: BTreeMap<PlayerId, Player>,
    },
    Turn {
        turn: TurnNumber,
        events: Vec<Event>,
    },
    GameEnded {
        scores: BTreeMap<PlayerId, Score>,
    },
}

impl ServerMessage {
    pub fn decode<R: Read>(r: &mut R) -> Result<ServerMessage, NetworkError> {
        let tag = r.read_u8()?;
        Ok(match tag {
            0 => ServerMessage::Hello {
                server_name: read_string(r)?,
                players_count: r.read_u8()?,
                size_x: r.read_u16::<BigEndian>()?,
                size_y: r.read_u16::<BigEndian>()?,
                game_length: r.read_u16::<BigEndian>()?,
                explosion_radius: r.read_u16::<BigEndian>()?,
                bomb_timer: r.read_u16::<BigEndian>()?,
            },
            1 => ServerMessage::AcceptedPlayer {
                player_id: r.read_u8()?,
                player: Player::read(r)?,
            },
            2 => ServerMessage::GameStarted {
                players: read_map(r, |r| Ok(r.read_u8()?), Player::read)?,
            },
            3 => ServerMessage::Turn {
                turn: r.read_u16::<BigEndian>()?,
                events: read_seq(r, Event::read)?,
            },
            4 => ServerMessage::GameEnded {
                scores: read_map(r, |r| Ok(r.read_u8()?), |r| Ok(r.read_u32::<BigEndian>()?))?,
            },
            _ => return Err(NetworkError::Fatal(ErrorType::UnknownTag(tag))),
        })
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), NetworkError> {
        match self {
            ServerMessage::Hello {
                server_name,
                players_count,
                size_x,
                size_y,
                game_length,
                explosion_radius,
                bomb_timer,
            } => {
                w.write_u8(0)?;
                write_string(w, server_name)?;
                w.write_u8(*players_count)?;
                w.write_u16::<BigEndian>(*size_x)?;
                w.write_u16::<BigEndian>(*size_y)?;
                w.write_u16::<BigEndian>(*game_length)?;
                w.write_u16::<BigEndian>(*explosion_radius)?;
                w.write_u16::<BigEndian>(*bomb_timer)?;
            }
            ServerMessage::AcceptedPlayer { player_id, player } => {
                w.write_u8(1)?;
                w.write_u8(*player_id)?;
                player.write(w)?;
            }
            ServerMessage::GameStarted { players } => {
                w.write_u8(2)?;
                write_map(w, players, |w, k| Ok(w.write_u8(*k)?), |w, v| v.write(w))?;
            }
            ServerMessage::Turn { turn, events } => {
                w.write_u8(3)?;
                w.write_u16::<BigEndian>(*turn)?;
                write_seq(w, events, |w, e| e.write(w))?;
            }
            ServerMessage::GameEnded { scores } => {
                w.write_u8(4)?;
                write_map(w, scores, |w, k| Ok(w.write_u8(*k)?), |w, v| Ok(w.write_u32::<BigEndian>(*v)?))?;
            }
        }
        Ok(())
    }
}

/// Front-end → client, carried one-per-datagram. Anything that fails to
/// decode cleanly is treated by the caller as `InvalidMessage` and dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrontEndMessage {
    PlaceBomb,
    PlaceBlock,
    Move { direction: Direction },
}

impl FrontEndMessage {
    pub fn decode<R: Read>(r: &mut R) -> Result<FrontEndMessage, NetworkError> {
        let tag = r.read_u8()?;
        Ok(match tag {
            0 => FrontEndMessage::PlaceBomb,
            1 => FrontEndMessage::PlaceBlock,
            2 => FrontEndMessage::Move { direction: Direction::read(r)? },
            _ => return Err(NetworkError::Fatal(ErrorType::UnknownTag(tag))),
        })
    }

    #[cfg(test)]
    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), NetworkError> {
        match self {
            FrontEndMessage::PlaceBomb => w.write_u8(0)?,
            FrontEndMessage::PlaceBlock => w.write_u8(1)?,
            FrontEndMessage::Move { direction } => {
                w.write_u8(2)?;
                direction.write(w)?;
            }
        }
        Ok(())
    }
}

/// Client → front-end, carried one-per-datagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientToFrontEnd {
    Lobby {
        server_name: String,
        players_count: PlayerId,
        size_x: Coord,
        size_y: Coord,
        game_length: TurnNumber,
        explosion_radius: u16,
        bomb_timer: u16,
        accepted_players: BTreeMap<PlayerId, Player>,
    },
    Game {
        server_name: String,
        size_x: Coord,
        size_y: Coord,
        game_length: TurnNumber,
        turn: TurnNumber,
        players: BTreeMap<PlayerId, Player>,
        player_positions: BTreeMap<PlayerId, Position>,
        blocks: Vec<Position>,
        bombs: BTreeMap<BombId, Bomb>,
        explosions: Vec<Position>,
        scores: BTreeMap<PlayerId, Score>,
    },
}

impl ClientToFrontEnd {
    #[cfg(test)]
    pub fn decode<R: Read>(r: &mut R) -> Result<ClientToFrontEnd, NetworkError> {
        let tag = r.read_u8()?;
        Ok(match tag {
            0 => ClientToFrontEnd::Lobby {
                server_name: read_string(r)?,
                players_count: r.read_u8()?,
                size_x: r.read_u16::<BigEndian>()?,
                size_y: r.read_u16::<BigEndian>()?,
                game_length: r.read_u16::<BigEndian>()?,
                explosion_radius: r.read_u16::<BigEndian>()?,
                bomb_timer: r.read_u16::<BigEndian>()?,
                accepted_players: read_map(r, |r| Ok(r.read_u8()?), Player::read)?,
            },
            1 => ClientToFrontEnd::Game {
                server_name: read_string(r)?,
                size_x: r.read_u16::<BigEndian>()?,
                size_y: r.read_u16::<BigEndian>()?,
                game_length: r.read_u16::<BigEndian>()?,
                turn: r.read_u16::<BigEndian>()?,
                players: read_map(r, |r| Ok(r.read_u8()?), Player::read)?,
                player_positions: read_map(r, |r| Ok(r.read_u8()?), Position::read)?,
                blocks: read_seq(r, Position::read)?,
                bombs: read_map(
                    r,
                    |r| Ok(r.read_u32::<BigEndian>()?),
                    |r| {
                        Ok(Bomb {
                            position: Position::read(r)?,
                            timer: r.read_u16::<BigEndian>()?,
                        })
                    },
                )?,
                explosions: read_seq(r, Position::read)?,
                scores: read_map(r, |r| Ok(r.read_u8()?), |r| Ok(r.read_u32::<BigEndian>()?))?,
            },
            _ => return Err(NetworkError::Fatal(ErrorType::UnknownTag(tag))),
        })
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), NetworkError> {
        match self {
            ClientToFrontEnd::Lobby {
                server_name,
                players_count,
                size_x,
                size_y,
                game_length,
                explosion_radius,
                bomb_timer,
                accepted_players,
            } => {
                w.write_u8(0)?;
                write_string(w, server_name)?;
                w.write_u8(*players_count)?;
                w.write_u16::<BigEndian>(*size_x)?;
                w.write_u16::<BigEndian>(*size_y)?;
                w.write_u16::<BigEndian>(*game_length)?;
                w.write_u16::<BigEndian>(*explosion_radius)?;
                w.write_u16::<BigEndian>(*bomb_timer)?;
                write_map(w, accepted_players, |w, k| Ok(w.write_u8(*k)?), |w, v| v.write(w))?;
            }
            ClientToFrontEnd::Game {
                server_name,
                size_x,
                size_y,
                game_length,
                turn,
                players,
                player_positions,
                blocks,
                bombs,
                explosions,
                scores,
            } => {
                w.write_u8(1)?;
                write_string(w, server_name)?;
                w.write_u16::<BigEndian>(*size_x)?;
                w.write_u16::<BigEndian>(*size_y)?;
                w.write_u16::<BigEndian>(*game_length)?;
                w.write_u16::<BigEndian>(*turn)?;
                write_map(w, players, |w, k| Ok(w.write_u8(*k)?), |w, v| v.write(w))?;
                write_map(w, player_positions, |w, k| Ok(w.write_u8(*k)?), |w, v| v.write(w))?;
                write_seq(w, blocks, |w, p| p.write(w))?;
                write_map(
                    w,
                    bombs,
                    |w, k| Ok(w.write_u32::<BigEndian>(*k)?),
                    |w, v| {
                        v.position.write(w)?;
                        Ok(w.write_u16::<BigEndian>(v.timer)?)
                    },
                )?;
                write_seq(w, explosions, |w, p| p.write(w))?;
                write_map(w, scores, |w, k| Ok(w.write_u8(*k)?), |w, v| Ok(w.write_u32::<BigEndian>(*v)?))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_client_message_roundtrip() {
        let messages = vec![
            ClientMessage::Join { name: "ash".into() },
            ClientMessage::PlaceBomb,
            ClientMessage::PlaceBlock,
            ClientMessage::Move { direction: Direction::Left },
        ];

        for msg in messages {
            let mut buf = Vec::new();
            msg.encode(&mut buf).unwrap();
            let decoded = ClientMessage::decode(&mut Cursor::new(buf)).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn test_server_message_roundtrip() {
        let mut players = BTreeMap::new();
        players.insert(0u8, Player { name: "a".into(), address: "127.0.0.1:1".into() });

        let messages = vec![
            ServerMessage::Hello {
                server_name: "arena".into(),
                players_count: 2,
                size_x: 10,
                size_y: 10,
                game_length: 100,
                explosion_radius: 3,
                bomb_timer: 5,
            },
            ServerMessage::AcceptedPlayer {
                player_id: 0,
                player: Player { name: "a".into(), address: "127.0.0.1:1".into() },
            },
            ServerMessage::GameStarted { players: players.clone() },
            ServerMessage::Turn {
                turn: 1,
                events: vec![Event::PlayerMoved { player_id: 0, position: Position::new(1, 2) }],
            },
            ServerMessage::GameEnded { scores: BTreeMap::from([(0u8, 3u32)]) },
        ];

        for msg in messages {
            let mut buf = Vec::new();
            msg.encode(&mut buf).unwrap();
            let decoded = ServerMessage::decode(&mut Cursor::new(buf)).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let buf = vec![200u8];
        let err = ClientMessage::decode(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, NetworkError::Fatal(ErrorType::UnknownTag(200))));
    }

    #[test]
    fn test_front_end_message_roundtrip() {
        let msg = FrontEndMessage::Move { direction: Direction::Down };
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        let decoded = FrontEndMessage::decode(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_client_to_front_end_game_roundtrip() {
        let msg = ClientToFrontEnd::Game {
            server_name: "arena".into(),
            size_x: 10,
            size_y: 10,
            game_length: 50,
            turn: 4,
            players: BTreeMap::new(),
            player_positions: BTreeMap::from([(0u8, Position::new(1, 1))]),
            blocks: vec![Position::new(2, 2)],
            bombs: BTreeMap::from([(1u32, Bomb { position: Position::new(3, 3), timer: 2 })]),
            explosions: vec![],
            scores: BTreeMap::from([(0u8, 0u32)]),
        };

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        let decoded = ClientToFrontEnd::decode(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded, msg);
    }
}
