/// Events emitted during a simulation tick.
/// The front end and the debug log consume these; the simulation never reads them back.

use crate::domain::tile::Tile;

#[derive(Clone, Debug, PartialEq)]
#[allow(dead_code)]
pub enum GameEvent {
    PhaseLoaded { index: usize },
    RunStarted,
    PointCollected { x: usize, y: usize },
    IconCollected { tile: Tile, score: u32 },
    ObjectiveReached { final_phase: bool },
    PhaseCleared { index: usize },
    RunWon,
    PlayerCaught { lives_left: u32 },
    GameOver,
    RunReset,
}
