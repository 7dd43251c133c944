/// Movement rules, truth-table driven.
///
/// `can_step` is a pure query; `step` is the only function that moves an
/// actor by a delta. Movement is atomic: one full tile per call, never
/// diagonal, never queued.
///
/// ## Step Truth Table
/// ┌──────────────────────────────┬───────────┐
/// │ Condition                     │ Allow?    │
/// ├──────────────────────────────┼───────────┤
/// │ delta not a unit cardinal     │ DENY      │
/// │ destination out of bounds     │ DENY      │
/// │ destination is a wall         │ DENY      │
/// │ otherwise                     │ ALLOW     │
/// └──────────────────────────────┴───────────┘

use super::entity::Actor;
use super::grid::Grid;

/// The four legal deltas.
#[inline]
fn is_cardinal(dx: i32, dy: i32) -> bool {
    matches!((dx, dy), (1, 0) | (-1, 0) | (0, 1) | (0, -1))
}

#[inline]
fn target(actor: &Actor, dx: i32, dy: i32) -> (i32, i32) {
    (actor.x as i32 + dx, actor.y as i32 + dy)
}

pub fn can_step(grid: &Grid, actor: &Actor, dx: i32, dy: i32) -> bool {
    if !is_cardinal(dx, dy) {
        return false;
    }
    let (nx, ny) = target(actor, dx, dy);
    !grid.is_wall(nx, ny)
}

/// Move `actor` one tile if legal. Returns whether it moved.
pub fn step(grid: &Grid, actor: &mut Actor, dx: i32, dy: i32) -> bool {
    if !can_step(grid, actor, dx, dy) {
        return false;
    }
    let (nx, ny) = target(actor, dx, dy);
    // can_step guarantees (nx, ny) is in bounds, hence non-negative
    actor.x = nx as usize;
    actor.y = ny as usize;
    true
}

pub fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::grid_from;

    #[test]
    fn step_into_open_tile() {
        let g = grid_from(&[
            "#####",
            "#...#",
            "#####",
        ]);
        let mut a = Actor::new(1, 1);
        assert!(step(&g, &mut a, 1, 0));
        assert_eq!(a.pos(), (2, 1));
        assert!(step(&g, &mut a, -1, 0));
        assert_eq!(a.pos(), (1, 1));
    }

    #[test]
    fn step_blocked_by_wall() {
        let g = grid_from(&[
            "#####",
            "#.#.#",
            "#####",
        ]);
        let mut a = Actor::new(1, 1);
        assert!(!can_step(&g, &a, 1, 0));
        assert!(!step(&g, &mut a, 1, 0));
        assert!(!step(&g, &mut a, 0, -1));
        assert_eq!(a.pos(), (1, 1));
    }

    #[test]
    fn step_off_the_map_edge_is_blocked() {
        let g = grid_from(&["..."]);
        let mut a = Actor::new(0, 0);
        assert!(!step(&g, &mut a, -1, 0));
        assert!(!step(&g, &mut a, 0, -1));
        assert!(!step(&g, &mut a, 0, 1));
        assert_eq!(a.pos(), (0, 0));
    }

    #[test]
    fn diagonal_and_long_deltas_are_rejected() {
        let g = grid_from(&[
            "...",
            "...",
            "...",
        ]);
        let a = Actor::new(1, 1);
        assert!(!can_step(&g, &a, 1, 1));
        assert!(!can_step(&g, &a, 2, 0));
        assert!(!can_step(&g, &a, 0, 0));
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(manhattan((1, 1), (4, 5)), 7);
        assert_eq!(manhattan((4, 5), (1, 1)), 7);
        assert_eq!(manhattan((2, 2), (2, 2)), 0);
    }
}
