//! Explosion propagation, shared verbatim between the server's rule-driving
//! round loop and the client's event-driven view so both agree on which
//! cells a detonation lights up.

use std::collections::BTreeSet;
use wireframe::messages::{Coord, Position};

const ARMS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Cells a bomb at `origin` hits: its own cell, plus up to `radius` cells in
/// each cardinal direction, stopping at the board edge or right after a
/// blocked cell (the block itself is still hit).
pub fn explosion_cells(
    origin: Position,
    radius: u16,
    size_x: Coord,
    size_y: Coord,
    blocks: &BTreeSet<Position>,
) -> Vec<Position> {
    let mut cells = vec![origin];

    for (dx, dy) in ARMS.iter() {
        let mut x = origin.x as i32;
        let mut y = origin.y as i32;

        for _ in 0..radius {
            x += dx;
            y += dy;

            if x < 0 || y < 0 || x >= size_x as i32 || y >= size_y as i32 {
                break;
            }

            let cell = Position::new(x as u16, y as u16);
            cells.push(cell);

            if blocks.contains(&cell) {
                break;
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_zero_hits_only_origin() {
        let cells = explosion_cells(Position::new(5, 5), 0, 10, 10, &BTreeSet::new());
        assert_eq!(cells, vec![Position::new(5, 5)]);
    }

    #[test]
    fn test_stops_at_board_edge() {
        let cells = explosion_cells(Position::new(0, 0), 3, 10, 10, &BTreeSet::new());
        assert!(cells.contains(&Position::new(0, 0)));
        assert!(!cells.iter().any(|p| p.x > 3 || p.y > 3));
    }

    #[test]
    fn test_block_stops_propagation_but_is_hit() {
        let mut blocks = BTreeSet::new();
        blocks.insert(Position::new(6, 5));

        let cells = explosion_cells(Position::new(5, 5), 3, 10, 10, &blocks);

        assert!(cells.contains(&Position::new(6, 5)));
        assert!(!cells.contains(&Position::new(7, 5)));
    }
}
