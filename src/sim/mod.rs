pub mod event;
pub mod game;
pub mod phase;
pub mod step;
pub mod world;
