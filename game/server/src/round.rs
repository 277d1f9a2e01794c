use crate::shared::SharedState;
use gamecore::turnlog::TurnRecord;
use gamecore::{RoundConfig, Simulation};
use slog::{info, Logger};
use std::thread;
use std::time::Duration;

/// Runs rounds back to back for the lifetime of the process. Each iteration
/// waits for the lobby to fill, drives the simulation to completion, then
/// swaps in a fresh round before signaling the old one finished.
pub fn run(config: RoundConfig, shared: &SharedState, log: &Logger) {
    let mut version = 0u64;

    loop {
        let (handles, _, _) = shared.snapshot();
        let round_log = log.new(slog::o!("round" => version));

        info!(round_log, "waiting for lobby to fill"; "players_count" => config.players_count);
        handles.lobby.wait_full();
        shared.set_started(true);
        info!(round_log, "round started");

        let mut sim = Simulation::new(config.clone());
        let turn0 = sim.init();
        handles.turn_log.append(TurnRecord { turn: 0, events: turn0 });

        for turn in 1..=config.game_length {
            thread::sleep(Duration::from_millis(config.turn_duration_ms));
            let moves = handles.moves.snapshot_and_clear();
            let events = sim.tick(moves);
            handles.turn_log.append(TurnRecord { turn, events });
        }

        let scores = sim.state.scores.clone();
        info!(round_log, "round ended"; "scores" => ?scores);

        shared.swap();
        handles.turn_log.mark_finished(scores);

        version += 1;
    }
}
