/// Phase content: authored maps, the tile descriptor table, and loading.
///
/// ## Sources (priority order):
///   1. Content file (`phases.toml`, see below) if one was found
///   2. Built-in embedded phases
///
/// ## Content format (`phases.toml`):
///   ```toml
///   [[phase]]
///   id = 1
///   objective = "S"
///   respawn = "P"            # optional, defaults to "P"
///   intro = "..."
///   lesson = "..."
///   outro = "..."            # optional
///   map = ["#####", "#P.S#", "#####"]
///   labels = [{ text = "Bus station", x = 1, y = 1 }]
///
///   [tiles.M]                # optional, overrides the default table
///   score = 10
///   consumable = true
///   message = "..."
///   ```
///
/// ## Tile legend:
///   '#' = Wall            ' ' = Empty (collected)   '.' = Point
///   'M' = Transit         '=' = Crossing            'H' = Health
///   'O' = Lodging         'S' = Mall (objective)    'U' = Campus (objective)
///   'P' = Player spawn    'G' = Traffic ghost spawn
///
/// Everything is validated once, when the `PhaseBook` is built. After that
/// the simulation assumes well-formed, rectangular maps.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::entity::Actor;
use crate::domain::grid::Grid;
use crate::domain::tile::{Tile, TileRule, TileTable, ADVERSARY_SPAWN, PLAYER_SPAWN};
use crate::sim::world::{RunState, WorldState};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content defines no phases")]
    NoPhases,
    #[error("phase {phase}: map is empty")]
    EmptyMap { phase: u32 },
    #[error("phase {phase}: unknown symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol { phase: u32, symbol: char, x: usize, y: usize },
    #[error("phase {phase}: no descriptor for collectible {symbol:?}")]
    MissingDescriptor { phase: u32, symbol: char },
    #[error("phase {phase}: {symbol:?} is not an objective marker")]
    NotAnObjective { phase: u32, symbol: char },
    #[error("phase {phase}: objective {symbol:?} does not appear on the map")]
    ObjectiveMissing { phase: u32, symbol: char },
    #[error("phase {phase}: respawn symbol {symbol:?} must be walkable and not the phase objective")]
    InvalidRespawn { phase: u32, symbol: char },
    #[error("tile table: objective {symbol:?} cannot be consumable")]
    ConsumableObjective { symbol: char },
    #[error("tile table: {symbol:?} is not a collectible tile")]
    NotCollectible { symbol: String },
    #[error("{field}: expected a single symbol, got {value:?}")]
    BadSymbol { field: &'static str, value: String },
    #[error("could not read content file: {0}")]
    Io(#[from] std::io::Error),
    #[error("content file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A named place drawn by the front end.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: usize,
    pub y: usize,
}

/// Immutable, authored phase.
#[derive(Clone, Debug)]
pub struct PhaseDef {
    pub id: u32,
    pub rows: Vec<String>,
    pub objective: Tile,
    /// Symbol scanned for on a caught respawn.
    pub respawn: char,
    pub intro: String,
    pub lesson: String,
    /// Shown when the objective is reached. Empty means a stock message.
    pub outro: String,
    pub labels: Vec<Label>,
}

impl PhaseDef {
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// First occurrence of `symbol`, row-major.
    pub fn find_symbol(&self, symbol: char) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(y, row)| {
            row.chars().position(|c| c == symbol).map(|x| (x, y))
        })
    }

    /// Live grid for this phase: spawn symbols become street dots.
    pub fn build_grid(&self) -> Grid {
        Grid::new(
            self.rows.iter()
                .map(|row| row.chars().map(symbol_tile).collect())
                .collect(),
        )
    }

    /// Where the player starts when the phase loads.
    pub fn player_spawn(&self, grid: &Grid) -> (usize, usize) {
        self.find_symbol(PLAYER_SPAWN)
            .unwrap_or_else(|| walkable_near(grid, (1, 1), false))
    }

    pub fn adversary_spawn(&self, grid: &Grid) -> (usize, usize) {
        self.find_symbol(ADVERSARY_SPAWN).unwrap_or_else(|| {
            let corner = (grid.width().saturating_sub(2), grid.height().saturating_sub(2));
            walkable_near(grid, corner, true)
        })
    }

    /// Authored respawn coordinate, re-scanned from the immutable rows.
    pub fn respawn_point(&self) -> (usize, usize) {
        match self.find_symbol(self.respawn) {
            Some(pos) => pos,
            None => self.player_spawn(&self.build_grid()),
        }
    }
}

/// Spawn markers stand on ordinary street.
fn symbol_tile(ch: char) -> Tile {
    match ch {
        PLAYER_SPAWN | ADVERSARY_SPAWN => Tile::Point,
        other => Tile::from_symbol(other).unwrap_or(Tile::Wall),
    }
}

/// `preferred` if walkable, otherwise the first walkable cell scanning from
/// the top-left (or from the bottom-right when `from_end`).
fn walkable_near(grid: &Grid, preferred: (usize, usize), from_end: bool) -> (usize, usize) {
    if !grid.is_wall(preferred.0 as i32, preferred.1 as i32) {
        return preferred;
    }
    let cells = (0..grid.height()).flat_map(|y| (0..grid.width()).map(move |x| (x, y)));
    let open = |&(x, y): &(usize, usize)| !grid.is_wall(x as i32, y as i32);
    let found = if from_end {
        cells.collect::<Vec<_>>().into_iter().rev().find(open)
    } else {
        cells.into_iter().find(open)
    };
    found.unwrap_or(preferred)
}

/// Pad ragged rows with walls. Returns whether anything was padded.
fn pad_rows(rows: &mut [String]) -> bool {
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut padded = false;
    for row in rows.iter_mut() {
        let len = row.chars().count();
        if len < width {
            row.extend(std::iter::repeat(Tile::Wall.symbol()).take(width - len));
            padded = true;
        }
    }
    padded
}

// ══════════════════════════════════════════════════════════════
// PhaseBook
// ══════════════════════════════════════════════════════════════

/// Ordered phases plus the tile descriptor table. Never mutated.
#[derive(Clone, Debug)]
pub struct PhaseBook {
    phases: Vec<PhaseDef>,
    tiles: TileTable,
}

impl PhaseBook {
    /// Validate and build. Ragged rows are padded with walls.
    pub fn new(mut phases: Vec<PhaseDef>, tiles: TileTable) -> Result<Self, ContentError> {
        if phases.is_empty() {
            return Err(ContentError::NoPhases);
        }
        validate_table(&tiles)?;
        for def in &mut phases {
            if pad_rows(&mut def.rows) {
                log::warn!("phase {}: ragged rows padded with walls", def.id);
            }
            validate_phase(def, &tiles)?;
        }
        Ok(PhaseBook { phases, tiles })
    }

    /// Built-in content.
    pub fn embedded() -> Self {
        let mut phases = embedded_phases();
        for def in &mut phases {
            pad_rows(&mut def.rows);
        }
        PhaseBook { phases, tiles: TileTable::default() }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ContentError> {
        let content: TomlContent = toml::from_str(text)?;
        let mut tiles = TileTable::default();
        for (key, rule) in content.tiles {
            let symbol = single_symbol("tiles", &key)?;
            let tile = Tile::from_symbol(symbol)
                .filter(|t| t.is_collectible())
                .ok_or(ContentError::NotCollectible { symbol: key.clone() })?;
            tiles.set(tile, TileRule {
                score: rule.score,
                consumable: rule.consumable,
                message: rule.message,
            });
        }

        let mut phases = Vec::with_capacity(content.phase.len());
        for p in content.phase {
            let objective_symbol = single_symbol("objective", &p.objective)?;
            let objective = Tile::from_symbol(objective_symbol)
                .filter(|t| t.is_objective())
                .ok_or(ContentError::NotAnObjective { phase: p.id, symbol: objective_symbol })?;
            phases.push(PhaseDef {
                id: p.id,
                rows: p.map,
                objective,
                respawn: single_symbol("respawn", &p.respawn)?,
                intro: p.intro,
                lesson: p.lesson,
                outro: p.outro,
                labels: p.labels.into_iter()
                    .map(|l| Label { text: l.text, x: l.x, y: l.y })
                    .collect(),
            });
        }

        PhaseBook::new(phases, tiles)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = std::fs::read_to_string(path)?;
        let book = Self::from_toml_str(&text)?;
        log::info!("loaded {} phases from {}", book.len(), path.display());
        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn get(&self, index: usize) -> Option<&PhaseDef> {
        self.phases.get(index)
    }

    pub fn is_final(&self, index: usize) -> bool {
        index + 1 >= self.phases.len()
    }

    pub fn tiles(&self) -> &TileTable {
        &self.tiles
    }
}

fn single_symbol(field: &'static str, value: &str) -> Result<char, ContentError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ContentError::BadSymbol { field, value: value.to_string() }),
    }
}

fn validate_table(tiles: &TileTable) -> Result<(), ContentError> {
    for (tile, rule) in tiles.iter() {
        if tile.is_objective() && rule.consumable {
            return Err(ContentError::ConsumableObjective { symbol: tile.symbol() });
        }
    }
    Ok(())
}

fn validate_phase(def: &PhaseDef, tiles: &TileTable) -> Result<(), ContentError> {
    let phase = def.id;
    if def.height() == 0 || def.width() == 0 {
        return Err(ContentError::EmptyMap { phase });
    }
    if !def.objective.is_objective() {
        return Err(ContentError::NotAnObjective { phase, symbol: def.objective.symbol() });
    }

    let mut objective_seen = false;
    for (y, row) in def.rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let tile = match ch {
                PLAYER_SPAWN | ADVERSARY_SPAWN => Tile::Point,
                other => Tile::from_symbol(other)
                    .ok_or(ContentError::UnknownSymbol { phase, symbol: other, x, y })?,
            };
            if tile.is_collectible() && tiles.get(tile).is_none() {
                return Err(ContentError::MissingDescriptor { phase, symbol: tile.symbol() });
            }
            objective_seen |= tile == def.objective;
        }
    }
    if !objective_seen {
        return Err(ContentError::ObjectiveMissing { phase, symbol: def.objective.symbol() });
    }

    let respawn_ok = def.respawn == PLAYER_SPAWN
        || Tile::from_symbol(def.respawn).is_some_and(|t| !t.is_wall() && t != def.objective);
    if !respawn_ok {
        return Err(ContentError::InvalidRespawn { phase, symbol: def.respawn });
    }
    Ok(())
}

// ── TOML Schema ──

#[derive(Deserialize, Debug)]
struct TomlContent {
    #[serde(default)]
    phase: Vec<TomlPhase>,
    #[serde(default)]
    tiles: BTreeMap<String, TomlTileRule>,
}

#[derive(Deserialize, Debug)]
struct TomlPhase {
    id: u32,
    objective: String,
    #[serde(default = "default_respawn")]
    respawn: String,
    #[serde(default)]
    intro: String,
    #[serde(default)]
    lesson: String,
    #[serde(default)]
    outro: String,
    map: Vec<String>,
    #[serde(default)]
    labels: Vec<TomlLabel>,
}

#[derive(Deserialize, Debug)]
struct TomlLabel {
    text: String,
    x: usize,
    y: usize,
}

#[derive(Deserialize, Debug)]
struct TomlTileRule {
    score: u32,
    #[serde(default = "default_consumable")]
    consumable: bool,
    #[serde(default)]
    message: Option<String>,
}

fn default_respawn() -> String { PLAYER_SPAWN.to_string() }
fn default_consumable() -> bool { true }

// ══════════════════════════════════════════════════════════════
// Loading a phase into the world
// ══════════════════════════════════════════════════════════════

/// Load phase `index` into the world and enter READY.
/// Preserves score and lives. Returns false if there is no such phase.
pub fn load_phase(world: &mut WorldState, book: &PhaseBook, index: usize, message_ticks: u32) -> bool {
    let def = match book.get(index) {
        Some(def) => def,
        None => {
            log::warn!("no phase at index {index} ({} loaded)", book.len());
            return false;
        }
    };

    let grid = def.build_grid();
    let (px, py) = def.player_spawn(&grid);
    let (gx, gy) = def.adversary_spawn(&grid);

    world.grid = grid;
    world.player = Actor::new(px, py);
    world.adversary = Actor::new(gx, gy);
    world.intent.clear();
    world.phase_index = index;
    world.phase_id = def.id;
    world.tick = 0;
    world.pending_advance = None;
    world.state = RunState::Ready;
    world.set_message(&def.intro, message_ticks);

    log::info!("phase {} loaded ({}x{})", def.id, world.grid.width(), world.grid.height());
    true
}

// ══════════════════════════════════════════════════════════════
// Embedded phases
// ══════════════════════════════════════════════════════════════

fn embedded_phases() -> Vec<PhaseDef> {
    vec![
        make_embedded(1, Tile::Mall, PLAYER_SPAWN,
            "Phase 1: from the bus station to Salvador Shopping.",
            "Fragmented crossings and car-first infrastructure.",
            "You reached Salvador Shopping. Preparing the next phase...",
            &[
                "########################################",
                "#P....M.....##..............H..........#",
                "#.#########.##.#######################.#",
                "#.#########.##.#######################.#",
                "#....=......##........S.......OOOOOOO.#",
                "#####.##########################.######",
                "#####.##########################.######",
                "#.............####......####...........#",
                "#.###########.####.####.####.#########.#",
                "#.###########......####......#########.#",
                "#...............####......####.........#",
                "######.############################.####",
                "######.############################.####",
                "#..............##.................G....#",
                "########################################",
            ],
            &[
                ("Bus station", 2, 1),
                ("Pernambues (M)", 12, 1),
                ("Hospital Sarah", 28, 1),
                ("Salvador Shopping", 22, 4),
                ("Mercure / Boulevard", 22, 6),
                ("Av. Tancredo Neves", 10, 8),
                ("Hospital da Bahia", 24, 10),
            ]),
        make_embedded(2, Tile::Campus, 'S',
            "Phase 2: from Salvador Shopping to UNIFACS.",
            "Wide avenues become barriers in a student's day.",
            "You made it to UNIFACS!",
            &[
                "########################################",
                "#....S........##........H..............#",
                "#.############.##.###################..#",
                "#.############.##.###################..#",
                "#......O......##.........=.............#",
                "#####.##########################.######",
                "#####.##########################.######",
                "#.............####......####...........#",
                "#.###########.####.####.####.#########.#",
                "#.###########......####......#########.#",
                "#...............####......####.........#",
                "######.############################.####",
                "######.############################.####",
                "#..............##.........U.......G...#",
                "########################################",
            ],
            &[
                ("Salvador Shopping", 3, 1),
                ("Av. Tancredo Neves", 10, 7),
                ("Hospital Sarah", 28, 1),
                ("Sotero Hotel", 5, 4),
                ("Footbridge", 22, 5),
                ("UNIFACS Tancredo Neves", 22, 13),
                ("Dinosaur Lagoon", 28, 7),
            ]),
    ]
}

#[allow(clippy::too_many_arguments)]
fn make_embedded(
    id: u32,
    objective: Tile,
    respawn: char,
    intro: &str,
    lesson: &str,
    outro: &str,
    map: &[&str],
    labels: &[(&str, usize, usize)],
) -> PhaseDef {
    PhaseDef {
        id,
        rows: map.iter().map(|s| s.to_string()).collect(),
        objective,
        respawn,
        intro: intro.to_string(),
        lesson: lesson.to_string(),
        outro: outro.to_string(),
        labels: labels.iter()
            .map(|&(text, x, y)| Label { text: text.to_string(), x, y })
            .collect(),
    }
}

/// Build a single-objective phase from a string diagram.
#[cfg(test)]
pub(crate) fn test_phase(id: u32, objective: Tile, rows: &[&str]) -> PhaseDef {
    make_embedded(id, objective, PLAYER_SPAWN, "intro", "lesson", "", rows, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(phases: Vec<PhaseDef>) -> Result<PhaseBook, ContentError> {
        PhaseBook::new(phases, TileTable::default())
    }

    #[test]
    fn embedded_content_is_valid() {
        let embedded = PhaseBook::embedded();
        let validated = book(embedded_phases()).expect("embedded content validates");
        assert_eq!(validated.len(), 2);
        assert_eq!(embedded.len(), 2);
        assert!(!embedded.is_final(0));
        assert!(embedded.is_final(1));
        for i in 0..embedded.len() {
            let def = embedded.get(i).unwrap();
            let width = def.width();
            assert!(def.rows.iter().all(|r| r.chars().count() == width));
        }
    }

    #[test]
    fn embedded_spawns_are_walkable() {
        let b = PhaseBook::embedded();
        for i in 0..b.len() {
            let def = b.get(i).unwrap();
            let grid = def.build_grid();
            for (x, y) in [def.player_spawn(&grid), def.adversary_spawn(&grid), def.respawn_point()] {
                assert!(!grid.is_wall(x as i32, y as i32), "phase {} spawn ({x},{y})", def.id);
            }
        }
    }

    #[test]
    fn spawn_symbols_become_points() {
        let def = test_phase(1, Tile::Mall, &[
            "######",
            "#P.SG#",
            "######",
        ]);
        let grid = def.build_grid();
        assert_eq!(grid.tile_at(1, 1), Tile::Point);
        assert_eq!(grid.tile_at(4, 1), Tile::Point);
        assert_eq!(def.player_spawn(&grid), (1, 1));
        assert_eq!(def.adversary_spawn(&grid), (4, 1));
    }

    #[test]
    fn missing_spawns_fall_back_to_walkable_cells() {
        let def = test_phase(1, Tile::Mall, &[
            "######",
            "##..S#",
            "#...##",
            "######",
        ]);
        let grid = def.build_grid();
        // (1,1) is a wall: first walkable from the top-left.
        assert_eq!(def.player_spawn(&grid), (2, 1));
        // (4,2) is a wall: first walkable from the bottom-right.
        assert_eq!(def.adversary_spawn(&grid), (3, 2));
    }

    #[test]
    fn respawn_scans_the_authored_rows() {
        let mut def = test_phase(2, Tile::Campus, &[
            "#######",
            "#.S..U#",
            "#######",
        ]);
        def.respawn = 'S';
        assert_eq!(def.respawn_point(), (2, 1));
        def.respawn = PLAYER_SPAWN;
        // No 'P' at all: same fallback as the load-time spawn.
        assert_eq!(def.respawn_point(), (1, 1));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let b = book(vec![test_phase(1, Tile::Mall, &[
            "#####",
            "#P.S",
            "#####",
        ])]).unwrap();
        assert_eq!(b.get(0).unwrap().rows[1], "#P.S#");
    }

    #[test]
    fn rejects_no_phases() {
        assert!(matches!(book(vec![]), Err(ContentError::NoPhases)));
    }

    #[test]
    fn rejects_unknown_symbol() {
        let err = book(vec![test_phase(3, Tile::Mall, &["#P?S#"])]).unwrap_err();
        assert!(matches!(err, ContentError::UnknownSymbol { phase: 3, symbol: '?', x: 2, y: 0 }));
    }

    #[test]
    fn rejects_missing_objective() {
        let err = book(vec![test_phase(1, Tile::Campus, &["#P.S#"])]).unwrap_err();
        assert!(matches!(err, ContentError::ObjectiveMissing { symbol: 'U', .. }));
    }

    #[test]
    fn rejects_non_objective_marker() {
        let err = book(vec![test_phase(1, Tile::Transit, &["#PMS#"])]).unwrap_err();
        assert!(matches!(err, ContentError::NotAnObjective { symbol: 'M', .. }));
    }

    #[test]
    fn rejects_collectible_without_descriptor() {
        let mut tiles = TileTable::empty();
        tiles.set(Tile::Point, TileRule { score: 1, consumable: true, message: None });
        tiles.set(Tile::Mall, TileRule { score: 15, consumable: false, message: None });
        let err = PhaseBook::new(vec![test_phase(1, Tile::Mall, &["#PHS#"])], tiles).unwrap_err();
        assert!(matches!(err, ContentError::MissingDescriptor { symbol: 'H', .. }));
    }

    #[test]
    fn rejects_consumable_objective() {
        let mut tiles = TileTable::default();
        tiles.set(Tile::Mall, TileRule { score: 15, consumable: true, message: None });
        let err = PhaseBook::new(vec![test_phase(1, Tile::Mall, &["#P.S#"])], tiles).unwrap_err();
        assert!(matches!(err, ContentError::ConsumableObjective { symbol: 'S' }));
    }

    #[test]
    fn rejects_wall_respawn() {
        let mut def = test_phase(1, Tile::Mall, &["#P.S#"]);
        def.respawn = '#';
        let err = book(vec![def]).unwrap_err();
        assert!(matches!(err, ContentError::InvalidRespawn { symbol: '#', .. }));
    }

    #[test]
    fn rejects_objective_respawn() {
        let mut def = test_phase(1, Tile::Campus, &["#PG.U.#"]);
        def.respawn = 'U';
        let err = book(vec![def]).unwrap_err();
        assert!(matches!(err, ContentError::InvalidRespawn { symbol: 'U', .. }));

        let text = r#"
            [[phase]]
            id = 1
            objective = "U"
            respawn = "U"
            map = ['#######', '#PG.U.#', '#S....#', '#######']
        "#;
        let err = PhaseBook::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ContentError::InvalidRespawn { symbol: 'U', .. }));

        // another phase's marker is fine
        let mut def = test_phase(1, Tile::Campus, &["#PG.U.#", "#S....#"]);
        def.respawn = 'S';
        assert!(book(vec![def]).is_ok());
    }

    #[test]
    fn parses_toml_content() {
        let text = r#"
            [[phase]]
            id = 1
            objective = "S"
            intro = "Go"
            lesson = "Walk"
            map = ['#####', '#P.S#', '#G..#', '#####']
            labels = [{ text = "Mall", x = 3, y = 1 }]

            [[phase]]
            id = 2
            objective = "U"
            respawn = "S"
            map = ['######', '#PSMU#', '######']

            [tiles.M]
            score = 12
            message = "Metro"
        "#;
        let b = PhaseBook::from_toml_str(text).unwrap();
        assert_eq!(b.len(), 2);
        let first = b.get(0).unwrap();
        assert_eq!(first.objective, Tile::Mall);
        assert_eq!(first.respawn, 'P');
        assert_eq!(first.labels, vec![Label { text: "Mall".into(), x: 3, y: 1 }]);
        assert_eq!(b.get(1).unwrap().respawn, 'S');
        let metro = b.tiles().get(Tile::Transit).unwrap();
        assert_eq!(metro.score, 12);
        assert!(metro.consumable);
        assert_eq!(metro.message.as_deref(), Some("Metro"));
        // untouched defaults survive
        assert_eq!(b.tiles().get(Tile::Health).unwrap().score, 6);
    }

    #[test]
    fn toml_symbol_errors() {
        let multi = "[[phase]]\nid = 1\nobjective = \"SU\"\nmap = [\"#P.S#\"]\n";
        assert!(matches!(
            PhaseBook::from_toml_str(multi),
            Err(ContentError::BadSymbol { field: "objective", .. })
        ));

        let wall_rule = "[[phase]]\nid = 1\nobjective = \"S\"\nmap = [\"#P.S#\"]\n[tiles.\"#\"]\nscore = 3\n";
        assert!(matches!(
            PhaseBook::from_toml_str(wall_rule),
            Err(ContentError::NotCollectible { .. })
        ));

        assert!(matches!(PhaseBook::from_toml_str("[[phase]"), Err(ContentError::Parse(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("walkable-no-such-phases.toml");
        assert!(matches!(PhaseBook::load(&path), Err(ContentError::Io(_))));
    }

    #[test]
    fn load_phase_resets_phase_local_state() {
        let b = PhaseBook::embedded();
        let mut w = WorldState::new();
        w.score = 40;
        w.lives = 2;
        w.tick = 99;
        w.intent.requested = Some(crate::domain::entity::Dir::Left);
        w.state = RunState::PhaseClear;

        assert!(load_phase(&mut w, &b, 1, 30));
        assert_eq!(w.phase_index, 1);
        assert_eq!(w.phase_id, 2);
        assert_eq!(w.state, RunState::Ready);
        assert_eq!(w.tick, 0);
        assert_eq!(w.intent, Default::default());
        assert_eq!((w.score, w.lives), (40, 2));
        assert_eq!(w.player.pos(), (1, 1));
        assert_eq!(w.adversary.pos(), (34, 13));
        assert_eq!(w.message(), Some(("Phase 2: from Salvador Shopping to UNIFACS.", 30)));
        assert!(!load_phase(&mut w, &b, 2, 30));
    }
}
