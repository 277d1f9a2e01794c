use std::collections::BTreeMap;
use std::sync::{Condvar, Mutex};
use wireframe::messages::{Event, PlayerId, Score, TurnNumber};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnRecord {
    pub turn: TurnNumber,
    pub events: Vec<Event>,
}

struct State {
    turns: Vec<TurnRecord>,
    finished: bool,
    scores: BTreeMap<PlayerId, Score>,
}

/// Append-only record of a round's turns, plus the terminal "game ended"
/// signal. Writer tasks stream turns out as they arrive and block for the
/// terminal signal once they have drained every turn.
pub struct TurnLog {
    state: Mutex<State>,
    changed: Condvar,
}

impl TurnLog {
    pub fn new() -> TurnLog {
        TurnLog {
            state: Mutex::new(State {
                turns: Vec::new(),
                finished: false,
                scores: BTreeMap::new(),
            }),
            changed: Condvar::new(),
        }
    }

    pub fn append(&self, record: TurnRecord) {
        let mut guard = self.state.lock().unwrap();
        guard.turns.push(record);
        self.changed.notify_all();
    }

    /// Blocks until turn `index` exists, then returns a copy of it.
    pub fn get(&self, index: usize) -> TurnRecord {
        let guard = self.state.lock().unwrap();
        let guard = self
            .changed
            .wait_while(guard, |state| state.turns.len() <= index)
            .unwrap();
        guard.turns[index].clone()
    }

    pub fn mark_finished(&self, scores: BTreeMap<PlayerId, Score>) {
        let mut guard = self.state.lock().unwrap();
        guard.finished = true;
        guard.scores = scores;
        self.changed.notify_all();
    }

    /// Blocks until the round has ended, then returns the final scores.
    pub fn wait_finished(&self) -> BTreeMap<PlayerId, Score> {
        let guard = self.state.lock().unwrap();
        let guard = self.changed.wait_while(guard, |state| !state.finished).unwrap();
        guard.scores.clone()
    }
}

impl Default for TurnLog {
    fn default() -> Self {
        TurnLog::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_get_blocks_until_appended() {
        let log = Arc::new(TurnLog::new());
        let reader = Arc::clone(&log);

        let handle = thread::spawn(move || reader.get(0));

        thread::sleep(Duration::from_millis(20));
        log.append(TurnRecord { turn: 0, events: vec![] });

        let record = handle.join().unwrap();
        assert_eq!(record.turn, 0);
    }

    #[test]
    fn test_wait_finished_blocks_until_marked() {
        let log = Arc::new(TurnLog::new());
        let waiter = Arc::clone(&log);

        let handle = thread::spawn(move || waiter.wait_finished());

        thread::sleep(Duration::from_millis(20));
        let mut scores = BTreeMap::new();
        scores.insert(0u8, 3u32);
        log.mark_finished(scores.clone());

        assert_eq!(handle.join().unwrap(), scores);
    }
}
