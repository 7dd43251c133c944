/// Traffic ghost AI: memoryless, locally greedy pursuit.
///
/// Each decision tick:
///   1. **Candidates** are the cardinal deltas the ghost can legally take,
///      enumerated in the fixed order right, left, down, up.
///   2. **Chase** (probability `bias`) picks the candidate whose landing cell is
///      closest (Manhattan) to the player; ties keep the earliest candidate.
///   3. **Wander** (otherwise) picks a uniformly random candidate.
///
/// No path search: corners are how the player shakes it off.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::Actor;
use super::grid::Grid;
use super::rules;

/// Default probability of taking the chase branch.
pub const CHASE_BIAS: f64 = 0.6;

/// Enumeration order matters: it is the tie-break order.
const DELTAS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Randomness injected into the policy.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;
    /// Uniform index in `[0, n)`. `n` is never zero.
    fn index(&mut self, n: usize) -> usize;
}

/// PCG-backed source. Seeded runs replay identically.
pub struct PcgSource(Pcg32);

impl PcgSource {
    pub fn seeded(seed: u64) -> Self {
        PcgSource(Pcg32::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        PcgSource(Pcg32::from_rng(&mut rand::rng()))
    }
}

impl RandomSource for PcgSource {
    fn unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }

    fn index(&mut self, n: usize) -> usize {
        self.0.random_range(0..n)
    }
}

/// Legal deltas from the ghost's cell, in tie-break order.
pub fn candidates(grid: &Grid, ghost: &Actor) -> Vec<(i32, i32)> {
    DELTAS
        .iter()
        .copied()
        .filter(|&(dx, dy)| rules::can_step(grid, ghost, dx, dy))
        .collect()
}

/// Pick the ghost's next delta, or `None` at a dead end.
pub fn choose_step(
    grid: &Grid,
    ghost: &Actor,
    player: &Actor,
    bias: f64,
    rng: &mut dyn RandomSource,
) -> Option<(i32, i32)> {
    let options = candidates(grid, ghost);
    if options.is_empty() {
        return None;
    }

    if rng.unit() < bias {
        let mut best = options[0];
        let mut best_dist = usize::MAX;
        for &(dx, dy) in &options {
            let landing = ((ghost.x as i32 + dx) as usize, (ghost.y as i32 + dy) as usize);
            let dist = rules::manhattan(landing, player.pos());
            if dist < best_dist {
                best_dist = dist;
                best = (dx, dy);
            }
        }
        Some(best)
    } else {
        Some(options[rng.index(options.len())])
    }
}

/// Run one decision tick. Returns whether the ghost moved.
pub fn advance_adversary(
    grid: &Grid,
    ghost: &mut Actor,
    player: &Actor,
    bias: f64,
    rng: &mut dyn RandomSource,
) -> bool {
    match choose_step(grid, ghost, player, bias, rng) {
        Some((dx, dy)) => rules::step(grid, ghost, dx, dy),
        None => false,
    }
}

/// Deterministic source for tests: replays scripted values, then falls back
/// to `0.0` (always chase) and index `0`.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    pub units: std::collections::VecDeque<f64>,
    pub indices: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedSource {
    pub fn new(units: &[f64], indices: &[usize]) -> Self {
        ScriptedSource {
            units: units.iter().copied().collect(),
            indices: indices.iter().copied().collect(),
        }
    }

    pub fn always_chase() -> Self {
        Self::new(&[], &[])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0)
    }

    fn index(&mut self, n: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % n
    }
}
