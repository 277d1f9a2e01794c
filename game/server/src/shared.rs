use gamecore::lobby::Lobby;
use gamecore::moves::MoveCollector;
use gamecore::turnlog::TurnLog;
use std::sync::{Arc, RwLock};

/// The three per-round containers a connection's reader/writer tasks need.
/// Cloning is cheap (`Arc` bumps); an old set survives as long as a task
/// still holds it, even after `SharedState::swap` moves the process on to
/// the next round.
#[derive(Clone)]
pub struct RoundHandles {
    pub lobby: Arc<Lobby>,
    pub moves: Arc<MoveCollector>,
    pub turn_log: Arc<TurnLog>,
}

impl RoundHandles {
    fn fresh(players_count: u8) -> RoundHandles {
        RoundHandles {
            lobby: Arc::new(Lobby::new(players_count)),
            moves: Arc::new(MoveCollector::new(players_count)),
            turn_log: Arc::new(TurnLog::new()),
        }
    }
}

struct Inner {
    handles: RoundHandles,
    version: u64,
    started: bool,
}

/// Process-wide versioned round state, protected by a shared-exclusive
/// lock: every reader takes it only long enough to clone out `Arc` handles.
pub struct SharedState {
    inner: RwLock<Inner>,
    players_count: u8,
}

impl SharedState {
    pub fn new(players_count: u8) -> SharedState {
        SharedState {
            inner: RwLock::new(Inner {
                handles: RoundHandles::fresh(players_count),
                version: 0,
                started: false,
            }),
            players_count,
        }
    }

    /// Returns the current handles, round version, and whether the round
    /// has started.
    pub fn snapshot(&self) -> (RoundHandles, u64, bool) {
        let guard = self.inner.read().unwrap();
        (guard.handles.clone(), guard.version, guard.started)
    }

    pub fn set_started(&self, started: bool) {
        self.inner.write().unwrap().started = started;
    }

    /// Swaps in a fresh round, bumping the version and clearing `started`.
    /// Returns the handles the just-finished round used, so the caller can
    /// mark their turn log finished once the new round is already live.
    pub fn swap(&self) -> RoundHandles {
        let mut guard = self.inner.write().unwrap();
        let old = guard.handles.clone();
        guard.handles = RoundHandles::fresh(self.players_count);
        guard.version += 1;
        guard.started = false;
        old
    }
}
