use gamecore::rules;
use std::collections::{BTreeMap, BTreeSet};
use wireframe::messages::{
    Bomb, BombId, ClientToFrontEnd, Coord, Event, Player, PlayerId, Position, Score, ServerMessage,
    TurnNumber,
};

/// Everything the client needs to know from `Hello`, carried alongside the
/// two views it builds from it.
#[derive(Clone)]
pub struct RoundInfo {
    pub server_name: String,
    pub players_count: PlayerId,
    pub size_x: Coord,
    pub size_y: Coord,
    pub game_length: TurnNumber,
    pub explosion_radius: u16,
    pub bomb_timer: u16,
}

impl RoundInfo {
    pub fn from_hello(hello: &ServerMessage) -> RoundInfo {
        match hello {
            ServerMessage::Hello {
                server_name,
                players_count,
                size_x,
                size_y,
                game_length,
                explosion_radius,
                bomb_timer,
            } => RoundInfo {
                server_name: server_name.clone(),
                players_count: *players_count,
                size_x: *size_x,
                size_y: *size_y,
                game_length: *game_length,
                explosion_radius: *explosion_radius,
                bomb_timer: *bomb_timer,
            },
            _ => panic!("RoundInfo::from_hello called with a non-Hello message"),
        }
    }
}

/// Local reconstruction of the lobby, refreshed on every `AcceptedPlayer`.
pub struct LobbyView {
    pub info: RoundInfo,
    pub accepted: BTreeMap<PlayerId, Player>,
}

impl LobbyView {
    pub fn new(info: RoundInfo) -> LobbyView {
        LobbyView { info, accepted: BTreeMap::new() }
    }

    pub fn accept(&mut self, player_id: PlayerId, player: Player) {
        self.accepted.insert(player_id, player);
    }

    pub fn to_datagram(&self) -> ClientToFrontEnd {
        ClientToFrontEnd::Lobby {
            server_name: self.info.server_name.clone(),
            players_count: self.info.players_count,
            size_x: self.info.size_x,
            size_y: self.info.size_y,
            game_length: self.info.game_length,
            explosion_radius: self.info.explosion_radius,
            bomb_timer: self.info.bomb_timer,
            accepted_players: self.accepted.clone(),
        }
    }
}

/// Local reconstruction of the running game, driven entirely by the
/// `Turn` event stream rather than by re-running the simulation's rules.
pub struct GameView {
    pub info: RoundInfo,
    pub players: BTreeMap<PlayerId, Player>,
    pub turn: TurnNumber,
    pub player_positions: BTreeMap<PlayerId, Position>,
    pub blocks: BTreeSet<Position>,
    pub bombs: BTreeMap<BombId, Bomb>,
    pub scores: BTreeMap<PlayerId, Score>,
    explosions: Vec<Position>,
}

impl GameView {
    pub fn new(info: RoundInfo, players: BTreeMap<PlayerId, Player>) -> GameView {
        let scores = players.keys().map(|&id| (id, 0)).collect();
        GameView {
            info,
            players,
            turn: 0,
            player_positions: BTreeMap::new(),
            blocks: BTreeSet::new(),
            bombs: BTreeMap::new(),
            scores,
            explosions: Vec::new(),
        }
    }

    /// Applies one turn's events, mirroring the simulation's own per-tick
    /// ordering: existing bomb timers decrement first, then events apply in
    /// order, then destroyed blocks are removed and scores bumped.
    pub fn apply_turn(&mut self, turn: TurnNumber, events: &[Event]) {
        self.turn = turn;
        self.explosions.clear();

        for bomb in self.bombs.values_mut() {
            bomb.timer = bomb.timer.saturating_sub(1);
        }

        let mut destroyed_blocks: BTreeSet<Position> = BTreeSet::new();
        let mut destroyed_players: BTreeSet<PlayerId> = BTreeSet::new();

        for event in events {
            match event {
                Event::BombPlaced { bomb_id, position } => {
                    self.bombs.insert(
                        *bomb_id,
                        Bomb { position: *position, timer: self.info.bomb_timer },
                    );
                }
                Event::BombExploded { bomb_id, destroyed_players: players, destroyed_blocks: blocks } => {
                    if let Some(bomb) = self.bombs.remove(bomb_id) {
                        let cells = rules::explosion_cells(
                            bomb.position,
                            self.info.explosion_radius,
                            self.info.size_x,
                            self.info.size_y,
                            &self.blocks,
                        );
                        self.explosions.extend(cells);
                    }
                    destroyed_players.extend(players.iter().copied());
                    destroyed_blocks.extend(blocks.iter().copied());
                }
                Event::PlayerMoved { player_id, position } => {
                    self.player_positions.insert(*player_id, *position);
                }
                Event::BlockPlaced { position } => {
                    self.blocks.insert(*position);
                }
            }
        }

        for position in &destroyed_blocks {
            self.blocks.remove(position);
        }

        for id in destroyed_players {
            *self.scores.entry(id).or_insert(0) += 1;
        }
    }

    pub fn to_datagram(&self) -> ClientToFrontEnd {
        ClientToFrontEnd::Game {
            server_name: self.info.server_name.clone(),
            size_x: self.info.size_x,
            size_y: self.info.size_y,
            game_length: self.info.game_length,
            turn: self.turn,
            players: self.players.clone(),
            player_positions: self.player_positions.clone(),
            blocks: self.blocks.iter().copied().collect(),
            bombs: self.bombs.clone(),
            explosions: self.explosions.clone(),
            scores: self.scores.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> RoundInfo {
        RoundInfo {
            server_name: "arena".into(),
            players_count: 2,
            size_x: 10,
            size_y: 10,
            game_length: 10,
            explosion_radius: 2,
            bomb_timer: 3,
        }
    }

    #[test]
    fn test_bomb_placed_then_exploded_clears_tracking() {
        let mut view = GameView::new(info(), BTreeMap::new());
        view.player_positions.insert(0, Position::new(5, 5));

        view.apply_turn(1, &[Event::BombPlaced { bomb_id: 0, position: Position::new(5, 5) }]);
        assert!(view.bombs.contains_key(&0));

        view.apply_turn(
            2,
            &[Event::BombExploded { bomb_id: 0, destroyed_players: vec![0], destroyed_blocks: vec![] }],
        );

        assert!(!view.bombs.contains_key(&0));
        assert_eq!(view.scores[&0], 1);
    }

    #[test]
    fn test_destroyed_block_removed_after_turn() {
        let mut view = GameView::new(info(), BTreeMap::new());
        view.blocks.insert(Position::new(1, 1));

        view.apply_turn(
            1,
            &[Event::BombExploded { bomb_id: 0, destroyed_players: vec![], destroyed_blocks: vec![Position::new(1, 1)] }],
        );

        assert!(!view.blocks.contains(&Position::new(1, 1)));
    }
}
