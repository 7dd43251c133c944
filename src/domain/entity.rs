/// Actors and directional intent.

/// Cardinal direction of travel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// A grid-bound actor (player or traffic ghost).
/// Position changes only through `rules::step`, a respawn, or a phase load.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Actor {
    pub x: usize,
    pub y: usize,
}

impl Actor {
    pub fn new(x: usize, y: usize) -> Self {
        Actor { x, y }
    }

    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}

/// Buffered steering: `requested` comes from input and is promoted to
/// `committed` only once the target cell is walkable, so a turn queued
/// before a corner is taken as soon as the corner is reached.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Intent {
    pub requested: Option<Dir>,
    pub committed: Option<Dir>,
}

impl Intent {
    pub fn clear(&mut self) {
        self.requested = None;
        self.committed = None;
    }
}
