use crate::error::SimError;
use std::collections::BTreeMap;
use std::sync::{Condvar, Mutex};
use wireframe::messages::{Player, PlayerId};

/// Bounded admission set for one round. Accepts players first-come,
/// first-served up to its capacity; rejects anything past that.
pub struct Lobby {
    capacity: u8,
    players: Mutex<BTreeMap<PlayerId, Player>>,
    changed: Condvar,
}

impl Lobby {
    pub fn new(capacity: u8) -> Lobby {
        Lobby {
            capacity,
            players: Mutex::new(BTreeMap::new()),
            changed: Condvar::new(),
        }
    }

    /// Assigns the next dense id and admits `player`, or rejects if full.
    pub fn add(&self, player: Player) -> Result<PlayerId, SimError> {
        let mut guard = self.players.lock().unwrap();
        if guard.len() as u8 >= self.capacity {
            return Err(SimError::RejectedFull);
        }

        let id = guard.len() as PlayerId;
        guard.insert(id, player);
        self.changed.notify_all();
        Ok(id)
    }

    /// Blocks until player `id` has been admitted, then returns it.
    pub fn get(&self, id: PlayerId) -> Result<Player, SimError> {
        if id >= self.capacity {
            return Err(SimError::OutOfRange);
        }

        let guard = self.players.lock().unwrap();
        let guard = self
            .changed
            .wait_while(guard, |players| !players.contains_key(&id))
            .unwrap();
        Ok(guard[&id].clone())
    }

    /// Blocks until every seat is filled, then returns the whole roster.
    pub fn wait_full(&self) -> BTreeMap<PlayerId, Player> {
        let guard = self.players.lock().unwrap();
        let guard = self
            .changed
            .wait_while(guard, |players| (players.len() as u8) < self.capacity)
            .unwrap();
        guard.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn player(name: &str) -> Player {
        Player { name: name.into(), address: "127.0.0.1:0".into() }
    }

    #[test]
    fn test_add_assigns_dense_ids_and_rejects_when_full() {
        let lobby = Lobby::new(2);
        assert_eq!(lobby.add(player("a")).unwrap(), 0);
        assert_eq!(lobby.add(player("b")).unwrap(), 1);
        assert_eq!(lobby.add(player("c")).unwrap_err(), SimError::RejectedFull);
    }

    #[test]
    fn test_get_out_of_range() {
        let lobby = Lobby::new(1);
        assert_eq!(lobby.get(5).unwrap_err(), SimError::OutOfRange);
    }

    #[test]
    fn test_get_blocks_until_admitted() {
        let lobby = Arc::new(Lobby::new(2));
        let reader = Arc::clone(&lobby);

        let handle = thread::spawn(move || reader.get(1).unwrap());

        thread::sleep(Duration::from_millis(20));
        lobby.add(player("a")).unwrap();
        lobby.add(player("b")).unwrap();

        let got = handle.join().unwrap();
        assert_eq!(got.name, "b");
    }

    #[test]
    fn test_wait_full_blocks_until_capacity_reached() {
        let lobby = Arc::new(Lobby::new(2));
        let waiter = Arc::clone(&lobby);

        let handle = thread::spawn(move || waiter.wait_full());

        lobby.add(player("a")).unwrap();
        thread::sleep(Duration::from_millis(20));
        lobby.add(player("b")).unwrap();

        let roster = handle.join().unwrap();
        assert_eq!(roster.len(), 2);
    }
}
