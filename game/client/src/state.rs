use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Lobby,
    Game,
}

/// State shared between the uplink and downlink tasks: which phase the
/// round is in, and whether this process has already sent its `Join`.
pub struct ClientState {
    pub phase: Mutex<Phase>,
    pub join_sent: Mutex<bool>,
}

impl ClientState {
    pub fn new() -> ClientState {
        ClientState {
            phase: Mutex::new(Phase::Lobby),
            join_sent: Mutex::new(false),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap()
    }

    pub fn set_phase(&self, phase: Phase) {
        *self.phase.lock().unwrap() = phase;
    }

    pub fn take_join_sent(&self) -> bool {
        let mut guard = self.join_sent.lock().unwrap();
        let was_sent = *guard;
        *guard = true;
        was_sent
    }

    pub fn reset_join_sent(&self) {
        *self.join_sent.lock().unwrap() = false;
    }
}

impl Default for ClientState {
    fn default() -> Self {
        ClientState::new()
    }
}
