use crate::config::RoundConfig;
use crate::rng::Lcg;
use crate::rules;
use std::collections::{BTreeMap, BTreeSet};
use wireframe::messages::{Bomb, BombId, ClientMessage, Event, PlayerId, Position, Score};

/// The mutable, per-round game state. Replaced wholesale at round
/// boundaries; mutated only by `Simulation`.
#[derive(Clone, Debug)]
pub struct RoundState {
    pub player_positions: BTreeMap<PlayerId, Position>,
    pub blocks: BTreeSet<Position>,
    pub bombs: BTreeMap<BombId, Bomb>,
    pub scores: BTreeMap<PlayerId, Score>,
    next_bomb_id: BombId,
}

impl RoundState {
    fn new(players_count: u8) -> RoundState {
        RoundState {
            player_positions: BTreeMap::new(),
            blocks: BTreeSet::new(),
            bombs: BTreeMap::new(),
            scores: (0..players_count).map(|id| (id, 0)).collect(),
            next_bomb_id: 0,
        }
    }
}

/// Drives the authoritative simulation one tick at a time. Holds the seeded
/// RNG, so identical configs and identical per-tick move snapshots always
/// produce byte-identical turn streams.
pub struct Simulation {
    pub config: RoundConfig,
    pub state: RoundState,
    rng: Lcg,
}

impl Simulation {
    pub fn new(config: RoundConfig) -> Simulation {
        let seed = config.seed;
        let players_count = config.players_count;
        Simulation {
            config,
            state: RoundState::new(players_count),
            rng: Lcg::new(seed),
        }
    }

    fn random_position(&mut self) -> Position {
        Position::new(
            self.rng.next_bounded(self.config.size_x),
            self.rng.next_bounded(self.config.size_y),
        )
    }

    /// Produces turn 0: initial player placement, then initial blocks.
    pub fn init(&mut self) -> Vec<Event> {
        let mut events = Vec::new();

        for id in 0..self.config.players_count {
            let position = self.random_position();
            self.state.player_positions.insert(id, position);
            events.push(Event::PlayerMoved { player_id: id, position });
        }

        for _ in 0..self.config.initial_blocks {
            let position = self.random_position();
            self.state.blocks.insert(position);
            events.push(Event::BlockPlaced { position });
        }

        events
    }

    /// Advances one tick given the latest per-player command snapshot.
    pub fn tick(&mut self, moves: Vec<Option<ClientMessage>>) -> Vec<Event> {
        let mut events = Vec::new();
        let mut destroyed_players: BTreeSet<PlayerId> = BTreeSet::new();
        let mut destroyed_blocks: BTreeSet<Position> = BTreeSet::new();

        for bomb in self.state.bombs.values_mut() {
            bomb.timer = bomb.timer.saturating_sub(1);
        }

        let detonating: Vec<BombId> = self
            .state
            .bombs
            .iter()
            .filter(|(_, bomb)| bomb.timer == 0)
            .map(|(id, _)| *id)
            .collect();

        for bomb_id in detonating {
            let bomb = self.state.bombs.remove(&bomb_id).expect("id came from this map");
            let cells = rules::explosion_cells(
                bomb.position,
                self.config.explosion_radius,
                self.config.size_x,
                self.config.size_y,
                &self.state.blocks,
            );

            let mut hit_players = Vec::new();
            let mut hit_blocks = Vec::new();

            for cell in &cells {
                for (&player_id, &position) in self.state.player_positions.iter() {
                    if position == *cell && destroyed_players.insert(player_id) {
                        hit_players.push(player_id);
                    }
                }
                if self.state.blocks.contains(cell) && destroyed_blocks.insert(*cell) {
                    hit_blocks.push(*cell);
                }
            }

            events.push(Event::BombExploded {
                bomb_id,
                destroyed_players: hit_players,
                destroyed_blocks: hit_blocks,
            });
        }

        for id in 0..self.config.players_count {
            if destroyed_players.contains(&id) {
                let position = self.random_position();
                self.state.player_positions.insert(id, position);
                events.push(Event::PlayerMoved { player_id: id, position });
                continue;
            }

            if let Some(command) = moves.get(id as usize).cloned().flatten() {
                self.apply_command(id, command, &mut events);
            }
        }

        for position in &destroyed_blocks {
            self.state.blocks.remove(position);
        }

        for id in destroyed_players {
            *self.state.scores.entry(id).or_insert(0) += 1;
        }

        events
    }

    fn apply_command(&mut self, id: PlayerId, command: ClientMessage, events: &mut Vec<Event>) {
        match command {
            ClientMessage::Join { .. } => {}
            ClientMessage::PlaceBomb => {
                let position = self.state.player_positions[&id];
                let bomb_id = self.state.next_bomb_id;
                self.state.next_bomb_id += 1;
                self.state.bombs.insert(
                    bomb_id,
                    Bomb { position, timer: self.config.bomb_timer },
                );
                events.push(Event::BombPlaced { bomb_id, position });
            }
            ClientMessage::PlaceBlock => {
                let position = self.state.player_positions[&id];
                if self.state.blocks.insert(position) {
                    events.push(Event::BlockPlaced { position });
                }
            }
            ClientMessage::Move { direction } => {
                let position = self.state.player_positions[&id];
                let (dx, dy) = direction.offset();
                let target_x = position.x as i32 + dx;
                let target_y = position.y as i32 + dy;

                if target_x < 0
                    || target_y < 0
                    || target_x >= self.config.size_x as i32
                    || target_y >= self.config.size_y as i32
                {
                    return;
                }

                let target = Position::new(target_x as u16, target_y as u16);
                if !self.state.blocks.contains(&target) {
                    self.state.player_positions.insert(id, target);
                    events.push(Event::PlayerMoved { player_id: id, position: target });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RoundConfig {
        RoundConfig {
            server_name: "arena".into(),
            size_x: 10,
            size_y: 10,
            players_count: 2,
            bomb_timer: 2,
            explosion_radius: 2,
            initial_blocks: 0,
            game_length: 5,
            turn_duration_ms: 0,
            seed: 7,
        }
    }

    #[test]
    fn test_init_places_every_player_in_bounds() {
        let mut sim = Simulation::new(config());
        let events = sim.init();
        assert_eq!(events.len(), 2);
        for (_, position) in sim.state.player_positions.iter() {
            assert!(position.x < 10 && position.y < 10);
        }
    }

    #[test]
    fn test_determinism_same_seed_same_events() {
        let mut a = Simulation::new(config());
        let mut b = Simulation::new(config());

        assert_eq!(a.init(), b.init());
        assert_eq!(
            a.tick(vec![None, None]),
            b.tick(vec![None, None])
        );
    }

    #[test]
    fn test_bomb_detonates_after_exactly_timer_ticks() {
        let mut sim = Simulation::new(config());
        sim.state.player_positions.insert(0, Position::new(1, 1));
        sim.state.player_positions.insert(1, Position::new(9, 9));

        // bomb_timer is 2: placed at turn T, should explode at turn T+2.
        sim.tick(vec![Some(ClientMessage::PlaceBomb), None]);

        let events_t1 = sim.tick(vec![None, None]);
        assert!(!events_t1.iter().any(|e| matches!(e, Event::BombExploded { .. })));

        let events_t2 = sim.tick(vec![None, None]);
        assert!(events_t2.iter().any(|e| matches!(e, Event::BombExploded { .. })));
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut sim = Simulation::new(config());
        sim.state.player_positions.insert(0, Position::new(0, 0));
        sim.state.scores.insert(0, 0);

        let events = sim.tick(vec![Some(ClientMessage::Move { direction: wireframe::messages::Direction::Up }), None]);
        assert!(events.is_empty());
        assert_eq!(sim.state.player_positions[&0], Position::new(0, 0));
    }

    #[test]
    fn test_score_increments_once_per_destruction() {
        let mut sim = Simulation::new(config());
        sim.state.player_positions.insert(0, Position::new(5, 5));
        sim.state.player_positions.insert(1, Position::new(9, 9));
        sim.state.bombs.insert(0, Bomb { position: Position::new(5, 5), timer: 0 });

        sim.tick(vec![None, None]);
        assert_eq!(sim.state.scores[&0], 1);
        assert_eq!(sim.state.scores[&1], 0);
    }
}
