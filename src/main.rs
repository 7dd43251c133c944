/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use config::GameConfig;
use domain::ai::{PcgSource, RandomSource};
use sim::event::GameEvent;
use sim::game::Game;
use sim::phase::PhaseBook;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_ENV: &str = "WALKABLE_LOG";

fn main() {
    let sink = LogSink::stderr();
    init_logging(&sink);

    let config = GameConfig::load();
    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => sink.redirect(Box::new(file)),
            Err(e) => log::warn!("could not open log file {}: {e}", path.display()),
        }
    }

    let book = load_book(&config);
    let rng: Box<dyn RandomSource> = match config.rules.seed {
        Some(seed) => {
            log::info!("traffic seeded with {seed}");
            Box::new(PcgSource::seeded(seed))
        }
        None => Box::new(PcgSource::from_entropy()),
    };
    let mut game = Game::new(book, &config, rng);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }
    // Keep stderr output from tearing the alternate screen.
    if config.log_file.is_none() {
        sink.redirect(Box::new(io::sink()));
    }

    let result = game_loop(&mut game, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for walking the city!");
    println!("Final Score: {}", game.world().score);
}

fn game_loop(
    game: &mut Game,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        input.drain_events();
        if input.quit_requested() {
            break;
        }
        for cmd in input.commands() {
            game.post(cmd);
        }

        if last_tick.elapsed() >= tick_rate {
            let events = game.tick();
            log_events(&events);
            last_tick = Instant::now();
        }

        renderer.render(game.world(), game.book())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        log::debug!("{event:?}");
    }
}

/// Content file if one was found and is valid, otherwise the built-in phases.
fn load_book(config: &GameConfig) -> PhaseBook {
    match &config.phases_file {
        Some(path) => match PhaseBook::load(path) {
            Ok(book) => book,
            Err(e) => {
                log::warn!("{}: {e}; using built-in phases", path.display());
                PhaseBook::embedded()
            }
        },
        None => PhaseBook::embedded(),
    }
}

// ── Logging ──

/// Swappable log destination: stderr until the config names a file.
#[derive(Clone)]
struct LogSink(Arc<Mutex<Box<dyn Write + Send>>>);

impl LogSink {
    fn stderr() -> Self {
        LogSink(Arc::new(Mutex::new(Box::new(io::stderr()))))
    }

    fn redirect(&self, target: Box<dyn Write + Send>) {
        if let Ok(mut inner) = self.0.lock() {
            *inner = target;
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut inner) => inner.write(buf),
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.lock() {
            Ok(mut inner) => inner.flush(),
            Err(_) => Ok(()),
        }
    }
}

fn init_logging(sink: &LogSink) {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"))
        .target(env_logger::Target::Pipe(Box::new(sink.clone())))
        .init();
}
