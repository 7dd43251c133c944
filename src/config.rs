/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::ai::CHASE_BIAS;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub rules: RulesConfig,
    /// Resolved content file, if one was found on disk.
    pub phases_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

/// Cadences are in simulation ticks.
#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub player_move_rate: u32,    // player steps when tick % rate == 0
    pub adversary_move_rate: u32, // larger than the player's: the ghost is slower
    pub phase_advance_ticks: u32, // PHASE_CLEAR → next READY
    pub message_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub initial_lives: u32,
    pub chase_bias: f64,
    pub seed: Option<u64>,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            tick_rate_ms: default_tick_rate(),
            player_move_rate: default_player_move(),
            adversary_move_rate: default_adversary_move(),
            phase_advance_ticks: default_phase_advance(),
            message_ticks: default_message_ticks(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            initial_lives: default_lives(),
            chase_bias: default_chase_bias(),
            seed: None,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            speed: SpeedConfig::default(),
            rules: RulesConfig::default(),
            phases_file: None,
            log_file: None,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_player_move")]
    player_move_rate: u32,
    #[serde(default = "default_adversary_move")]
    adversary_move_rate: u32,
    #[serde(default = "default_phase_advance")]
    phase_advance_ticks: u32,
    #[serde(default = "default_message_ticks")]
    message_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_lives")]
    initial_lives: u32,
    #[serde(default = "default_chase_bias")]
    chase_bias: f64,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_phases_file")]
    phases_file: String,
    #[serde(default)]
    log_file: Option<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }          // ~60 ticks per second
fn default_player_move() -> u32 { 25 }        // one tile every ~0.4s
fn default_adversary_move() -> u32 { 45 }     // one tile every ~0.7s
fn default_phase_advance() -> u32 { 100 }     // ~1.6s
fn default_message_ticks() -> u32 { 150 }     // ~2.4s
fn default_lives() -> u32 { 3 }
fn default_chase_bias() -> f64 { CHASE_BIAS }
fn default_phases_file() -> String { "phases.toml".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            player_move_rate: default_player_move(),
            adversary_move_rate: default_adversary_move(),
            phase_advance_ticks: default_phase_advance(),
            message_ticks: default_message_ticks(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            initial_lives: default_lives(),
            chase_bias: default_chase_bias(),
            seed: None,
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            phases_file: default_phases_file(),
            log_file: None,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, CWD, XDG data home, system data dir.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        match read_config_text(&search_dirs) {
            Some(text) => Self::from_toml_str(&text, &search_dirs),
            None => Self::from_toml(TomlConfig::default(), &search_dirs),
        }
    }

    /// Parse config text directly (no file search for the config itself).
    pub fn from_toml_str(text: &str, search_dirs: &[PathBuf]) -> Self {
        let toml_cfg = match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("config.toml parse error: {e}; using default settings");
                TomlConfig::default()
            }
        };
        Self::from_toml(toml_cfg, search_dirs)
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let phases_file = resolve_file(&cfg.general.phases_file, search_dirs);
        let log_file = cfg.general.log_file.map(PathBuf::from);

        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: cfg.speed.tick_rate_ms.max(1),
                player_move_rate: at_least_one("player_move_rate", cfg.speed.player_move_rate),
                adversary_move_rate: at_least_one("adversary_move_rate", cfg.speed.adversary_move_rate),
                phase_advance_ticks: cfg.speed.phase_advance_ticks,
                message_ticks: cfg.speed.message_ticks,
            },
            rules: RulesConfig {
                initial_lives: at_least_one("initial_lives", cfg.rules.initial_lives),
                chase_bias: clamp_bias(cfg.rules.chase_bias),
                seed: cfg.rules.seed,
            },
            phases_file,
            log_file,
        }
    }
}

/// Cadences are used as moduli, so zero is not allowed.
fn at_least_one(key: &str, value: u32) -> u32 {
    if value == 0 {
        log::warn!("config: {key} must be at least 1, using 1");
        1
    } else {
        value
    }
}

fn clamp_bias(bias: f64) -> f64 {
    if bias.is_nan() {
        log::warn!("config: chase_bias is NaN, using {CHASE_BIAS}");
        return CHASE_BIAS;
    }
    if !(0.0..=1.0).contains(&bias) {
        log::warn!("config: chase_bias {bias} outside [0, 1], clamping");
    }
    bias.clamp(0.0, 1.0)
}

/// Absolute paths are taken as-is (if they exist); relative ones are
/// searched for in the candidate directories.
fn resolve_file(name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let path = Path::new(name);
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }
    search_dirs.iter().map(|d| d.join(name)).find(|p| p.is_file())
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/walkable)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/walkable");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/walkable");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
/// Text of the first readable `config.toml` in the search dirs.
fn read_config_text(search_dirs: &[PathBuf]) -> Option<String> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some(text),
                Err(e) => log::warn!("could not read {}: {e}", path.display()),
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        let cfg = GameConfig::from_toml_str("", &[]);
        assert_eq!(cfg.speed.tick_rate_ms, 16);
        assert_eq!(cfg.speed.player_move_rate, 25);
        assert_eq!(cfg.speed.adversary_move_rate, 45);
        assert_eq!(cfg.speed.phase_advance_ticks, 100);
        assert_eq!(cfg.rules.initial_lives, 3);
        assert!((cfg.rules.chase_bias - 0.6).abs() < 1e-9);
        assert_eq!(cfg.rules.seed, None);
        assert_eq!(cfg.phases_file, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[speed]\nplayer_move_rate = 4\n\n[rules]\nseed = 42\ninitial_lives = 5\n",
            &[],
        );
        assert_eq!(cfg.speed.player_move_rate, 4);
        assert_eq!(cfg.speed.adversary_move_rate, 45);
        assert_eq!(cfg.rules.seed, Some(42));
        assert_eq!(cfg.rules.initial_lives, 5);
    }

    #[test]
    fn zero_cadence_and_wild_bias_are_sanitized() {
        let cfg = GameConfig::from_toml_str(
            "[speed]\nadversary_move_rate = 0\n[rules]\nchase_bias = 3.5\ninitial_lives = 0\n",
            &[],
        );
        assert_eq!(cfg.speed.adversary_move_rate, 1);
        assert_eq!(cfg.rules.initial_lives, 1);
        assert_eq!(cfg.rules.chase_bias, 1.0);
    }

    #[test]
    fn malformed_text_falls_back_to_defaults() {
        let cfg = GameConfig::from_toml_str("[speed\nthis is not toml", &[]);
        assert_eq!(cfg.speed.player_move_rate, 25);
    }

    #[test]
    fn missing_phases_file_resolves_to_none() {
        let dir = std::env::temp_dir().join("walkable-config-test-missing");
        let cfg = GameConfig::from_toml_str(
            "[general]\nphases_file = \"no-such-file.toml\"\n",
            &[dir],
        );
        assert_eq!(cfg.phases_file, None);
    }

    #[test]
    fn reads_first_config_in_search_order() {
        let root = std::env::temp_dir().join(format!("walkable-cfg-{}", std::process::id()));
        let (first, second) = (root.join("a"), root.join("b"));
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(second.join("config.toml"), "[rules]\ninitial_lives = 7\n").unwrap();

        let dirs = vec![first.clone(), second.clone()];
        let text = read_config_text(&dirs).unwrap();
        assert_eq!(GameConfig::from_toml_str(&text, &dirs).rules.initial_lives, 7);
        assert!(read_config_text(&[first]).is_none());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
