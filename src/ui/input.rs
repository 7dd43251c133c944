/// Keyboard polling.
///
/// Drains every pending crossterm event without blocking and turns key
/// presses into controller `Command`s. Steering is edge-triggered: the
/// simulation keeps walking in the committed direction on its own, so
/// held keys and auto-repeat only re-post the same request.
///
/// Bindings:
///   Arrows / WASD   steer
///   Enter / Space   start
///   R               reset the run
///   Q / Esc / ^C    quit

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Dir;
use crate::sim::game::Command;

pub struct InputState {
    /// Key presses collected during the most recent `drain_events()`.
    pressed: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { pressed: Vec::with_capacity(8) }
    }

    /// Read all available events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.pressed.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    self.pressed.push(key);
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal event read failed: {e}");
                    break;
                }
            }
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.pressed.iter().any(is_quit)
    }

    /// Commands for this frame, in the order the keys arrived.
    pub fn commands(&self) -> Vec<Command> {
        self.pressed
            .iter()
            .filter(|k| !k.modifiers.contains(KeyModifiers::CONTROL))
            .filter_map(|k| key_command(k.code))
            .collect()
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn key_command(code: KeyCode) -> Option<Command> {
    let cmd = match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Steer(Dir::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::Steer(Dir::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Steer(Dir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Command::Steer(Dir::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Command::Start,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Reset,
        _ => return None,
    };
    Some(cmd)
}
