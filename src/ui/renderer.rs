/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Reads `WorldState` and `PhaseBook` only; never mutates the simulation.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::tile::Tile;
use crate::sim::phase::PhaseBook;
use crate::sim::world::{RunState, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 18, g: 20, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Renderer ──

/// Each grid tile is two terminal columns wide, so the map looks square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 28, g: 36, b: 70 };
const WALL_BG: Color = Color::Rgb { r: 52, g: 64, b: 110 };
const MSG_BG: Color = Color::Rgb { r: 210, g: 180, b: 60 };
const BOX_BG: Color = Color::Rgb { r: 36, g: 36, b: 48 };
const DIM: Color = Color::Rgb { r: 120, g: 120, b: 140 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_state: Option<(RunState, usize)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_state: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.fit_terminal();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, book: &PhaseBook) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.fit_terminal();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Overlays come and go with state changes: repaint everything.
        let state = (world.state, world.phase_index);
        if self.last_state != Some(state) {
            self.back.cells.fill(Cell::INVALID);
            self.last_state = Some(state);
        }

        self.front.clear();
        self.compose_hud(world);
        self.compose_map(world);
        self.compose_legend(world, book);
        self.compose_message(world);
        match world.state {
            RunState::Ready => self.compose_ready(world, book),
            RunState::PhaseClear => self.compose_banner(world, "PHASE CLEAR", Color::Green, None),
            RunState::Win => self.compose_banner(
                world, "YOU MADE IT!", Color::Yellow, Some("R: walk the city again   Q: quit"),
            ),
            RunState::GameOver => self.compose_banner(
                world, "GAME OVER", Color::Red, Some("R: try again   Q: quit"),
            ),
            RunState::Playing => {}
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn fit_terminal(&mut self) {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) { continue; }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &WorldState) {
        let hearts: String = "♥".repeat(w.lives as usize);
        let state = match w.state {
            RunState::Ready => "READY",
            RunState::Playing => "WALKING",
            RunState::PhaseClear => "PHASE CLEAR",
            RunState::Win => "WIN",
            RunState::GameOver => "GAME OVER",
        };
        let hud = format!(
            " Phase {}   Score: {:<6}  Lives: {:<5}  Streets left: {:<4}  {} ",
            w.phase_id, w.score, hearts, w.grid.count(Tile::Point), state,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_map(&mut self, w: &WorldState) {
        for (gy, row) in w.grid.rows().enumerate() {
            for (gx, &tile) in row.iter().enumerate() {
                let (glyph, fg, bg) = tile_visual(tile);
                let col = gx * CELL_W;
                self.front.set(col, MAP_ROW + gy, Cell::new(glyph, fg, bg));
                self.front.set(col + 1, MAP_ROW + gy, Cell::new(' ', fg, bg));
            }
        }

        let (gx, gy) = w.adversary.pos();
        self.put_actor(gx, gy, '&', Color::Rgb { r: 255, g: 80, b: 80 });
        let (px, py) = w.player.pos();
        self.put_actor(px, py, '@', Color::Rgb { r: 90, g: 255, b: 140 });
    }

    fn put_actor(&mut self, gx: usize, gy: usize, glyph: char, fg: Color) {
        let col = gx * CELL_W;
        self.front.set(col, MAP_ROW + gy, Cell::new(glyph, fg, Color::Reset));
        self.front.set(col + 1, MAP_ROW + gy, Cell::new(' ', fg, Color::Reset));
    }

    /// Places and tile key, to the right of the map.
    fn compose_legend(&mut self, w: &WorldState, book: &PhaseBook) {
        let x = w.grid.width() * CELL_W + 3;
        let mut y = MAP_ROW;
        self.front.put_str(x, y, "Places", Color::Yellow, Color::Reset);
        y += 1;
        if let Some(def) = book.get(w.phase_index) {
            for label in &def.labels {
                let line = format!("{:>2},{:<2} {}", label.x, label.y, label.text);
                self.front.put_str(x, y, &line, DIM, Color::Reset);
                y += 1;
            }
        }

        y += 1;
        self.front.put_str(x, y, "Key", Color::Yellow, Color::Reset);
        y += 1;
        for tile in Tile::ALL.into_iter().filter(|t| t.is_collectible()) {
            let (glyph, fg, _) = tile_visual(tile);
            self.front.set(x, y, Cell::new(glyph, fg, Color::Reset));
            let score = book.tiles().get(tile).map_or(0, |r| r.score);
            let line = format!("{} +{score}", tile_name(tile));
            self.front.put_str(x + 2, y, &line, DIM, Color::Reset);
            y += 1;
        }
        self.front.set(x, y, Cell::new('@', Color::Rgb { r: 90, g: 255, b: 140 }, Color::Reset));
        self.front.put_str(x + 2, y, "you", DIM, Color::Reset);
        self.front.set(x, y + 1, Cell::new('&', Color::Rgb { r: 255, g: 80, b: 80 }, Color::Reset));
        self.front.put_str(x + 2, y + 1, "traffic", DIM, Color::Reset);
    }

    fn compose_message(&mut self, w: &WorldState) {
        let msg_row = MAP_ROW + w.grid.height() + 1;
        if let Some((msg, _)) = w.message() {
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(1, msg_row, msg, Color::Black, MSG_BG);
        }
        let help = if w.state.is_terminal() {
            " R: restart   Q: quit"
        } else {
            " Arrows/WASD: walk   Enter/Space: start   R: restart   Q: quit"
        };
        self.front.put_str(0, msg_row + 2, help, DIM, Color::Reset);
    }

    fn compose_ready(&mut self, w: &WorldState, book: &PhaseBook) {
        let lesson = book.get(w.phase_index).map(|d| d.lesson.as_str()).unwrap_or("");
        let title = format!("PHASE {}", w.phase_id);
        let lines = [title.as_str(), lesson, "", "ENTER / SPACE to start"];
        self.compose_box(w, &lines, Color::Cyan);
    }

    fn compose_banner(&mut self, w: &WorldState, title: &str, color: Color, hint: Option<&str>) {
        let score = format!("Score: {}", w.score);
        let mut lines = vec![title, score.as_str()];
        if let Some(hint) = hint {
            lines.push("");
            lines.push(hint);
        }
        self.compose_box(w, &lines, color);
    }

    /// Centered box over the map. The first line is the title.
    fn compose_box(&mut self, w: &WorldState, lines: &[&str], color: Color) {
        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
        let map_cols = (w.grid.width() * CELL_W).max(inner + 2);
        let box_w = inner + 2;
        let box_h = lines.len() + 2;
        let box_x = (map_cols - box_w) / 2;
        let box_y = MAP_ROW + w.grid.height().saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::new(' ', Color::White, BOX_BG));
            }
        }
        let border = "─".repeat(box_w - 2);
        self.front.put_str(box_x, box_y, &format!("┌{border}┐"), color, BOX_BG);
        self.front.put_str(box_x, box_y + box_h - 1, &format!("└{border}┘"), color, BOX_BG);
        for (i, line) in lines.iter().enumerate() {
            let y = box_y + 1 + i;
            self.front.set(box_x, y, Cell::new('│', color, BOX_BG));
            self.front.set(box_x + box_w - 1, y, Cell::new('│', color, BOX_BG));
            let pad = (inner - line.chars().count()) / 2;
            let fg = if i == 0 { color } else { Color::White };
            self.front.put_str(box_x + 1 + pad, y, line, fg, BOX_BG);
        }
    }
}

fn tile_visual(tile: Tile) -> (char, Color, Color) {
    match tile {
        Tile::Wall => (' ', Color::White, WALL_BG),
        Tile::Empty => (' ', Color::White, Color::Reset),
        Tile::Point => ('·', Color::Rgb { r: 200, g: 200, b: 160 }, Color::Reset),
        Tile::Transit => ('M', Color::Rgb { r: 80, g: 180, b: 255 }, Color::Reset),
        Tile::Crossing => ('=', Color::Rgb { r: 255, g: 200, b: 80 }, Color::Reset),
        Tile::Health => ('+', Color::Rgb { r: 255, g: 110, b: 110 }, Color::Reset),
        Tile::Lodging => ('O', Color::Rgb { r: 200, g: 140, b: 255 }, Color::Reset),
        Tile::Mall => ('S', Color::Rgb { r: 255, g: 230, b: 60 }, Color::Rgb { r: 70, g: 60, b: 10 }),
        Tile::Campus => ('U', Color::Rgb { r: 120, g: 255, b: 200 }, Color::Rgb { r: 10, g: 60, b: 50 }),
    }
}

fn tile_name(tile: Tile) -> &'static str {
    match tile {
        Tile::Wall => "wall",
        Tile::Empty => "walked",
        Tile::Point => "street",
        Tile::Transit => "metro",
        Tile::Crossing => "footbridge",
        Tile::Health => "hospital",
        Tile::Lodging => "hotel",
        Tile::Mall => "shopping",
        Tile::Campus => "campus",
    }
}
