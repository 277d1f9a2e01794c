use crate::error::SimError;
use std::sync::Mutex;
use wireframe::messages::{ClientMessage, PlayerId};

#[derive(Clone)]
struct Slot {
    updated: bool,
    command: Option<ClientMessage>,
}

/// One pending command slot per player. A new `update` overwrites any
/// command still pending from the same tick; `snapshot_and_clear` is the
/// simulation's sole way of draining it, once per tick.
pub struct MoveCollector {
    slots: Mutex<Vec<Slot>>,
}

impl MoveCollector {
    pub fn new(players_count: u8) -> MoveCollector {
        let slots = vec![
            Slot { updated: false, command: None };
            players_count as usize
        ];
        MoveCollector { slots: Mutex::new(slots) }
    }

    pub fn update(&self, id: PlayerId, command: ClientMessage) -> Result<(), SimError> {
        let mut guard = self.slots.lock().unwrap();
        let slot = guard.get_mut(id as usize).ok_or(SimError::OutOfRange)?;
        slot.updated = true;
        slot.command = Some(command);
        Ok(())
    }

    /// Returns the latest command queued per player since the previous
    /// snapshot, clearing every slot's `updated` flag in the same step.
    pub fn snapshot_and_clear(&self) -> Vec<Option<ClientMessage>> {
        let mut guard = self.slots.lock().unwrap();
        guard
            .iter_mut()
            .map(|slot| {
                let taken = if slot.updated { slot.command.clone() } else { None };
                slot.updated = false;
                taken
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_update_wins_between_snapshots() {
        let collector = MoveCollector::new(2);
        collector.update(0, ClientMessage::PlaceBomb).unwrap();
        collector.update(0, ClientMessage::PlaceBlock).unwrap();

        let snapshot = collector.snapshot_and_clear();
        assert_eq!(snapshot[0], Some(ClientMessage::PlaceBlock));
        assert_eq!(snapshot[1], None);
    }

    #[test]
    fn test_snapshot_clears_updated_flag() {
        let collector = MoveCollector::new(1);
        collector.update(0, ClientMessage::PlaceBomb).unwrap();
        collector.snapshot_and_clear();

        let second = collector.snapshot_and_clear();
        assert_eq!(second[0], None);
    }

    #[test]
    fn test_update_out_of_range() {
        let collector = MoveCollector::new(1);
        assert_eq!(
            collector.update(5, ClientMessage::PlaceBomb).unwrap_err(),
            SimError::OutOfRange
        );
    }
}
