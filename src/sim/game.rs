/// Game controller: owns the world and its collaborators, buffers input.
///
/// Commands may arrive at any moment (between frames, several per frame).
/// They are queued and applied in order at the start of the next tick, so
/// a tick always sees a consistent world.

use std::collections::VecDeque;

use crate::config::{GameConfig, RulesConfig, SpeedConfig};
use crate::domain::ai::RandomSource;
use crate::domain::entity::Dir;
use super::event::GameEvent;
use super::phase::PhaseBook;
use super::step;
use super::world::WorldState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Steer(Dir),
    Start,
    Reset,
}

pub struct Game {
    world: WorldState,
    book: PhaseBook,
    speed: SpeedConfig,
    rules: RulesConfig,
    rng: Box<dyn RandomSource>,
    inbox: VecDeque<Command>,
}

impl Game {
    /// New run in READY at phase 0.
    pub fn new(book: PhaseBook, config: &GameConfig, rng: Box<dyn RandomSource>) -> Self {
        let mut game = Game {
            world: WorldState::new(),
            book,
            speed: config.speed.clone(),
            rules: config.rules.clone(),
            rng,
            inbox: VecDeque::new(),
        };
        let mut events = Vec::new();
        step::reset_run(&mut game.world, &game.book, &game.speed, &game.rules, &mut events);
        game
    }

    pub fn post(&mut self, cmd: Command) {
        self.inbox.push_back(cmd);
    }

    /// Apply buffered commands, then advance one tick.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Some(cmd) = self.inbox.pop_front() {
            match cmd {
                Command::Steer(dir) => step::steer(&mut self.world, dir),
                Command::Start => step::start_run(&mut self.world, &mut events),
                Command::Reset => step::reset_run(
                    &mut self.world, &self.book, &self.speed, &self.rules, &mut events,
                ),
            }
        }
        events.extend(step::step(
            &mut self.world, &self.book, &self.speed, &self.rules, self.rng.as_mut(),
        ));
        events
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn book(&self) -> &PhaseBook {
        &self.book
    }
}
