/// WorldState: the complete snapshot of a running game.
///
/// Owned by the `Game` controller and passed by reference to each step
/// function. The front end only ever sees `&WorldState`.
///
/// ## Tile Architecture
///
/// The authored map lives in the immutable `PhaseDef` (see `phase.rs`).
/// `grid` is the live copy for the active phase: spawn symbols extracted,
/// collectibles removed as they are picked up. It is rebuilt from the
/// `PhaseDef` on every phase load and reset.

use crate::domain::entity::{Actor, Intent};
use crate::domain::grid::Grid;

/// Machine state of the run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunState {
    /// Phase loaded, simulation paused until a start signal.
    Ready,
    Playing,
    /// Objective reached; the next phase loads after a delay.
    PhaseClear,
    Win,
    GameOver,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Win | RunState::GameOver)
    }
}

/// Deferred PHASE_CLEAR → READY transition.
/// Fires only if `generation` still matches the world's generation,
/// so a reset in between makes it inert.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PendingAdvance {
    pub generation: u64,
    pub ticks_remaining: u32,
}

pub struct WorldState {
    // ── Tiles ──
    pub grid: Grid,

    // ── Entities ──
    pub player: Actor,
    pub adversary: Actor,
    pub intent: Intent,

    // ── Run ──
    pub state: RunState,
    pub score: u32,
    pub lives: u32,
    pub phase_index: usize,
    pub phase_id: u32,
    /// Reset to 0 on every phase load; cadences are taken modulo this.
    pub tick: u64,

    // ── Deferred transition ──
    pub pending_advance: Option<PendingAdvance>,
    pub generation: u64,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl WorldState {
    pub fn new() -> Self {
        WorldState {
            grid: Grid::new(vec![]),
            player: Actor::new(0, 0),
            adversary: Actor::new(0, 0),
            intent: Intent::default(),
            state: RunState::Ready,
            score: 0,
            lives: 0,
            phase_index: 0,
            phase_id: 0,
            tick: 0,
            pending_advance: None,
            generation: 0,
            message: String::new(),
            message_timer: 0,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// The on-screen message and its remaining ticks, if any.
    pub fn message(&self) -> Option<(&str, u32)> {
        if self.message_timer > 0 && !self.message.is_empty() {
            Some((self.message.as_str(), self.message_timer))
        } else {
            None
        }
    }

    /// Age the message by one tick.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }

    pub fn caught(&self) -> bool {
        self.player.pos() == self.adversary.pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_expires_after_its_duration() {
        let mut w = WorldState::new();
        w.set_message("hello", 2);
        assert_eq!(w.message(), Some(("hello", 2)));
        w.tick_message();
        assert_eq!(w.message(), Some(("hello", 1)));
        w.tick_message();
        assert_eq!(w.message(), None);
        assert!(w.message.is_empty());
        w.tick_message();
        assert_eq!(w.message_timer, 0);
    }

    #[test]
    fn terminal_states() {
        assert!(RunState::Win.is_terminal());
        assert!(RunState::GameOver.is_terminal());
        assert!(!RunState::PhaseClear.is_terminal());
        assert!(!RunState::Ready.is_terminal());
    }
}
