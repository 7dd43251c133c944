/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Tick counter and message aging (every state)
///   2. Pending phase advance (every state)
///   --- everything below runs only while PLAYING ---
///   3. Intent promotion (requested → committed)
///   4. Player movement on the player cadence, then tile scoring
///   5. Objective check; reaching it ends the tick
///   6. Traffic ghost on the adversary cadence
///   7. Collision: lose a life, respawn or GAME OVER
///
/// Run control (start signal, full reset, steering) lives here too, so that
/// every mutation of `WorldState` goes through this module or `phase::load_phase`.

use crate::config::{RulesConfig, SpeedConfig};
use crate::domain::ai::{self, RandomSource};
use crate::domain::entity::{Actor, Dir};
use crate::domain::rules;
use crate::domain::tile::Tile;
use super::event::GameEvent;
use super::phase::{load_phase, PhaseBook};
use super::world::{PendingAdvance, RunState, WorldState};

const PHASE_CLEAR_MSG: &str = "Objective reached. Preparing the next phase...";
const WIN_MSG: &str = "You made it!";
const CAUGHT_MSG: &str = "Caught by traffic. The city does not put pedestrians first.";
const GAME_OVER_MSG: &str = "GAME OVER. Press R to try again.";

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(
    world: &mut WorldState,
    book: &PhaseBook,
    speed: &SpeedConfig,
    rules: &RulesConfig,
    rng: &mut dyn RandomSource,
) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;
    world.tick_message();

    resolve_pending_advance(world, book, speed, &mut events);
    if world.state != RunState::Playing { return events; }

    promote_intent(world);
    resolve_player_movement(world, book, speed, &mut events);
    if resolve_objective(world, book, speed, &mut events) { return events; }
    resolve_adversary(world, speed, rules, rng);
    resolve_collision(world, book, speed, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Run control
// ══════════════════════════════════════════════════════════════

/// Start signal. READY → PLAYING; re-affirms PLAYING; ignored elsewhere.
pub fn start_run(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    match world.state {
        RunState::Ready => {
            world.state = RunState::Playing;
            events.push(GameEvent::RunStarted);
            log::info!("phase {} started", world.phase_id);
        }
        RunState::Playing => {}
        RunState::PhaseClear | RunState::Win | RunState::GameOver => {
            log::debug!("start ignored in {:?}", world.state);
        }
    }
}

/// Full restart: phase 0, score 0, fresh lives. Cancels any pending advance.
pub fn reset_run(
    world: &mut WorldState,
    book: &PhaseBook,
    speed: &SpeedConfig,
    rules: &RulesConfig,
    events: &mut Vec<GameEvent>,
) {
    world.generation += 1;
    world.pending_advance = None;
    world.score = 0;
    world.lives = rules.initial_lives;
    events.push(GameEvent::RunReset);
    if load_phase(world, book, 0, speed.message_ticks) {
        events.push(GameEvent::PhaseLoaded { index: 0 });
    }
    log::info!("run reset ({} lives)", world.lives);
}

/// Record a steering request. Accepted in any state; only PLAYING acts on it.
pub fn steer(world: &mut WorldState, dir: Dir) {
    world.intent.requested = Some(dir);
}

// ══════════════════════════════════════════════════════════════
// Deferred phase advance
// ══════════════════════════════════════════════════════════════

fn resolve_pending_advance(
    world: &mut WorldState,
    book: &PhaseBook,
    speed: &SpeedConfig,
    events: &mut Vec<GameEvent>,
) {
    let Some(pending) = world.pending_advance.as_mut() else { return };
    pending.ticks_remaining = pending.ticks_remaining.saturating_sub(1);
    if pending.ticks_remaining > 0 { return; }

    let generation = pending.generation;
    world.pending_advance = None;
    if generation != world.generation {
        log::debug!("stale phase advance dropped (gen {generation})");
        return;
    }

    let next = world.phase_index + 1;
    if load_phase(world, book, next, speed.message_ticks) {
        events.push(GameEvent::PhaseLoaded { index: next });
    }
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

/// A queued turn is taken as soon as the cell in that direction opens up.
fn promote_intent(world: &mut WorldState) {
    if let Some(dir) = world.intent.requested {
        let (dx, dy) = dir.delta();
        if rules::can_step(&world.grid, &world.player, dx, dy) {
            world.intent.committed = Some(dir);
        }
    }
}

fn resolve_player_movement(
    world: &mut WorldState,
    book: &PhaseBook,
    speed: &SpeedConfig,
    events: &mut Vec<GameEvent>,
) {
    let Some(dir) = world.intent.committed else { return };
    if world.tick % u64::from(speed.player_move_rate) != 0 { return; }

    let (dx, dy) = dir.delta();
    if rules::step(&world.grid, &mut world.player, dx, dy) {
        resolve_pickup(world, book, speed, events);
    }
}

/// Score the tile the player just arrived on. Runs once per arrival.
fn resolve_pickup(
    world: &mut WorldState,
    book: &PhaseBook,
    speed: &SpeedConfig,
    events: &mut Vec<GameEvent>,
) {
    let (x, y) = world.player.pos();
    let tile = world.grid.tile_at(x as i32, y as i32);
    let Some(rule) = book.tiles().get(tile) else { return };

    world.score = world.score.saturating_add(rule.score);
    if rule.consumable {
        world.grid.consume(x as i32, y as i32);
    }
    if let Some(msg) = &rule.message {
        world.set_message(msg, speed.message_ticks);
    }

    if tile == Tile::Point {
        events.push(GameEvent::PointCollected { x, y });
    } else {
        events.push(GameEvent::IconCollected { tile, score: rule.score });
    }
}

/// Returns true if the objective was reached and the tick must end.
fn resolve_objective(
    world: &mut WorldState,
    book: &PhaseBook,
    speed: &SpeedConfig,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(def) = book.get(world.phase_index) else { return false };
    let (x, y) = world.player.pos();
    if world.grid.tile_at(x as i32, y as i32) != def.objective { return false; }

    let final_phase = book.is_final(world.phase_index);
    events.push(GameEvent::ObjectiveReached { final_phase });
    let outro = if def.outro.is_empty() { None } else { Some(def.outro.as_str()) };

    if final_phase {
        world.state = RunState::Win;
        world.set_message(outro.unwrap_or(WIN_MSG), speed.message_ticks);
        events.push(GameEvent::RunWon);
        log::info!("run won with score {}", world.score);
    } else {
        world.state = RunState::PhaseClear;
        world.set_message(outro.unwrap_or(PHASE_CLEAR_MSG), speed.message_ticks);
        world.pending_advance = Some(PendingAdvance {
            generation: world.generation,
            ticks_remaining: speed.phase_advance_ticks,
        });
        events.push(GameEvent::PhaseCleared { index: world.phase_index });
        log::info!("phase {} cleared with score {}", def.id, world.score);
    }
    true
}

// ══════════════════════════════════════════════════════════════
// Traffic ghost
// ══════════════════════════════════════════════════════════════

fn resolve_adversary(
    world: &mut WorldState,
    speed: &SpeedConfig,
    rules: &RulesConfig,
    rng: &mut dyn RandomSource,
) {
    if world.tick % u64::from(speed.adversary_move_rate) != 0 { return; }
    ai::advance_adversary(&world.grid, &mut world.adversary, &world.player, rules.chase_bias, rng);
}

// ══════════════════════════════════════════════════════════════
// Collision
// ══════════════════════════════════════════════════════════════

fn resolve_collision(
    world: &mut WorldState,
    book: &PhaseBook,
    speed: &SpeedConfig,
    events: &mut Vec<GameEvent>,
) {
    if !world.caught() { return; }

    world.lives = world.lives.saturating_sub(1);
    world.set_message(CAUGHT_MSG, speed.message_ticks);
    events.push(GameEvent::PlayerCaught { lives_left: world.lives });
    log::debug!("caught at {:?}, {} lives left", world.player.pos(), world.lives);

    if world.lives == 0 {
        world.state = RunState::GameOver;
        world.set_message(GAME_OVER_MSG, speed.message_ticks);
        events.push(GameEvent::GameOver);
        log::info!("game over with score {}", world.score);
        return;
    }

    // The ghost stays where it is.
    if let Some(def) = book.get(world.phase_index) {
        let (x, y) = def.respawn_point();
        world.player = Actor::new(x, y);
    }
    world.intent.clear();
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::ai::PcgSource;
    use proptest::prelude::*;

    fn dir_strategy() -> impl Strategy<Value = Option<Dir>> {
        prop_oneof![
            Just(None),
            Just(Some(Dir::Up)),
            Just(Some(Dir::Down)),
            Just(Some(Dir::Left)),
            Just(Some(Dir::Right)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_run_invariants_hold(
            seed in any::<u64>(),
            inputs in prop::collection::vec(dir_strategy(), 1..300),
        ) {
            let book = PhaseBook::embedded();
            let speed = SpeedConfig {
                player_move_rate: 2,
                adversary_move_rate: 3,
                ..SpeedConfig::default()
            };
            let rules = RulesConfig::default();
            let mut rng = PcgSource::seeded(seed);
            let mut world = WorldState::new();
            let mut events = vec![];
            reset_run(&mut world, &book, &speed, &rules, &mut events);
            start_run(&mut world, &mut events);

            let mut last_score = world.score;
            let mut was_terminal = false;
            for input in inputs {
                if let Some(dir) = input {
                    steer(&mut world, dir);
                }
                step(&mut world, &book, &speed, &rules, &mut rng);
                if world.state == RunState::Ready {
                    start_run(&mut world, &mut events);
                }

                let (px, py) = world.player.pos();
                let (gx, gy) = world.adversary.pos();
                prop_assert!(!world.grid.is_wall(px as i32, py as i32));
                prop_assert!(!world.grid.is_wall(gx as i32, gy as i32));
                prop_assert!(world.score >= last_score);
                prop_assert!(world.lives <= rules.initial_lives);
                prop_assert!(!was_terminal || world.state.is_terminal());
                last_score = world.score;
                was_terminal = world.state.is_terminal();
            }
        }
    }
}
