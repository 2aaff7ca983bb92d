/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads state. Fog, the ThankYou! message, toasts and
/// the credits cloud are all derived from the screen objects each frame.

use std::io::{self, BufWriter, Write};
use std::time::Instant;

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::Cell as MazeCell;
use crate::domain::entity::{Direction, Position};
use crate::domain::maze::Maze;
use crate::sim::app::{App, Screen};
use crate::sim::credits::{CreditsScreen, CREDITS};
use crate::sim::home::{HomeScreen, Page, Section, Tone, TOKEN};
use crate::sim::route::Route;
use crate::sim::session::MazeSession;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for every "empty" terminal cell, so row
    /// gaps on VTE terminals match the cell colour.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 4],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("")
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

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// Write a string centred on row y.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        self.put_str(centered(self.width, s), y, s, fg, bg);
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }

    /// Two-column block: the visual for one maze cell.
    fn set_pair(&mut self, col: usize, row: usize, c0: char, c1: char, fg: Color, bg: Color) {
        self.set(col, row, Cell::from_char(c0, fg, bg));
        self.set(col + 1, row, Cell::from_char(c1, fg, bg));
    }

    fn set_wide(&mut self, col: usize, row: usize, c: char, bg: Color) {
        self.set(col, row, Cell::from_char_wide(c, Color::Reset, bg));
        self.set(col + 1, row, Cell::WIDE_CONT);
    }
}

fn centered(width: usize, s: &str) -> usize {
    width.saturating_sub(s.chars().count()) / 2
}

// ── Layout & palette ──

/// Each maze cell = 2 terminal columns.
const CELL_W: usize = 2;

const TITLE_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// Left margin for the maze; leaves room for the entrance arrow.
const MAP_COL: usize = 4;

const TITLE: &str = "Help Me Reach the Farm";
const THANK_YOU: &str = "ThankYou!";

const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const DIM: Color = Color::Rgb { r: 120, g: 120, b: 140 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const TOAST_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const CORN_FG: Color = Color::Rgb { r: 230, g: 200, b: 60 };
const CORN_BG: Color = Color::Rgb { r: 40, g: 90, b: 30 };
const DIRT_BG: Color = Color::Rgb { r: 110, g: 75, b: 40 };
const BUMP_BG: Color = Color::Rgb { r: 170, g: 40, b: 40 };
const FOG_FG: Color = Color::Rgb { r: 210, g: 210, b: 220 };
const FOG_BG: Color = Color::Rgb { r: 150, g: 150, b: 165 };

/// Where an arrow marking `pos` goes, one cell outside the grid, and
/// which way it points. `inbound` arrows point into the maze.
fn border_arrow(maze: &Maze, pos: Position, inbound: bool) -> Option<(i32, i32, char)> {
    let (x, y) = (pos.x as i32, pos.y as i32);
    let outward = if pos.x == 0 {
        Direction::Left
    } else if pos.x + 1 == maze.width() {
        Direction::Right
    } else if pos.y == 0 {
        Direction::Up
    } else if pos.y + 1 == maze.height() {
        Direction::Down
    } else {
        return None;
    };
    let (dx, dy) = outward.delta();
    let ch = match (outward, inbound) {
        (Direction::Left, true) | (Direction::Right, false) => '→',
        (Direction::Right, true) | (Direction::Left, false) => '←',
        (Direction::Up, true) | (Direction::Down, false) => '↓',
        (Direction::Down, true) | (Direction::Up, false) => '↑',
    };
    Some((x + dx, y + dy, ch))
}

fn facing_glyph(dir: Direction) -> char {
    match dir {
        Direction::Up => '▲',
        Direction::Down => '▼',
        Direction::Left => '◀',
        Direction::Right => '▶',
    }
}

fn music_label(playing: bool) -> &'static str {
    if playing { "♪ ON" } else { "♪ MUTED" }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Plain => Color::White,
        Tone::Heading => GOLD,
        Tone::Muted => DIM,
        Tone::Highlight => GREEN,
    }
}

/// Terminal columns and rows the maze screen needs for `maze`: the grid,
/// the exit arrow to its right and the HUD below it.
pub fn maze_footprint(maze: &Maze) -> (usize, usize) {
    let cols = MAP_COL + (maze.width() + 1) * CELL_W;
    let rows = MAP_ROW + maze.height() + 3;
    (cols, rows)
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_route: Option<Route>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_route: None,
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

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, app: &App, now: Instant) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Screen change → clear for a clean transition
        let route = app.screen().route();
        if self.last_route != Some(route) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_route = Some(route);
        }

        self.front.clear();
        match app.screen() {
            Screen::Maze(session) => self.compose_maze(app.maze(), session, now),
            Screen::Home(home) => self.compose_home(home),
            Screen::Credits(credits) => self.compose_credits(credits),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the terminal default.
        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(Cell::BASE_BG))?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Maze screen ──

    fn compose_maze(&mut self, maze: &Maze, s: &MazeSession, now: Instant) {
        let state = s.state();
        self.front.put_centered(TITLE_ROW, TITLE, GOLD, Color::Reset);

        let player = s.nav().position();
        let bumping = s.bumping(now);
        for gy in 0..maze.height() {
            for gx in 0..maze.width() {
                let col = MAP_COL + gx * CELL_W;
                let row = MAP_ROW + gy;
                if col + 1 >= self.front.width { break; }

                if state.fog_visible() {
                    self.front.set_pair(col, row, '░', '░', FOG_FG, FOG_BG);
                    continue;
                }
                if player.x == gx && player.y == gy {
                    let bg = if bumping { BUMP_BG } else { DIRT_BG };
                    self.front.set_wide(col, row, '🧑', bg);
                    continue;
                }
                match maze.cell_at(gx as i32, gy as i32) {
                    MazeCell::Blocked => self.front.set_pair(col, row, '▒', '▒', CORN_FG, CORN_BG),
                    MazeCell::Walkable => self.front.set_pair(col, row, ' ', ' ', Color::White, DIRT_BG),
                    MazeCell::Entrance | MazeCell::Exit => {
                        self.front.set_pair(col, row, '·', '·', GOLD, DIRT_BG)
                    }
                }
            }
        }

        // Entry / exit markers just outside the grid
        for (pos, inbound, fg) in [(maze.entrance(), true, GREEN), (maze.exit(), false, GOLD)] {
            if let Some((ax, ay, ch)) = border_arrow(maze, pos, inbound) {
                let col = MAP_COL as i32 + ax * CELL_W as i32;
                let row = MAP_ROW as i32 + ay;
                if col >= 0 && row >= 0 {
                    self.front.set_pair(col as usize, row as usize, ch, ' ', fg, Color::Reset);
                }
            }
        }

        // HUD under the maze
        let hud_row = MAP_ROW + maze.height() + 1;
        if hud_row < self.front.height {
            self.front.fill_row(hud_row, HUD_BG);
            let hud = format!(
                " Moves:{:<4} Facing:{}  {} ",
                s.moves(),
                facing_glyph(s.nav().direction()),
                music_label(s.music_playing()),
            );
            self.front.put_str(0, hud_row, &hud, Color::White, HUD_BG);
        }
        let help_row = hud_row + 2;
        if help_row < self.front.height {
            let help = " ←↑↓→/WASD:Move  M:Music  Esc/Q:Quit  │  Pad: D-pad";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }

        if state.message_visible() {
            let mid = MAP_ROW + maze.height() / 2;
            let box_w = THANK_YOU.len() + 8;
            let left = centered(self.front.width, &" ".repeat(box_w));
            for dy in 0..3 {
                for dx in 0..box_w {
                    self.front.set(left + dx, mid - 1 + dy, Cell::from_char(' ', Color::Black, Color::White));
                }
            }
            self.front.put_centered(mid, THANK_YOU, Color::Black, Color::White);
        }
    }

    // ── Home screen ──

    fn compose_home(&mut self, h: &HomeScreen) {
        let mut top = 0;
        if h.header_visible() {
            self.front.fill_row(0, HUD_BG);
            let mut header = format!(" {TOKEN} ");
            for (i, section) in Section::ALL.iter().enumerate() {
                header.push_str(&format!("  [{}] {}", i + 1, section.label()));
            }
            header.push_str(&format!("  [B] Behind the Scenes  [M] {}", music_label(h.music_playing())));
            self.front.put_str(0, 0, &header, GOLD, HUD_BG);
            top = 2;
        }

        // Keep the last row for the toast / help line.
        let body_rows = self.front.height.saturating_sub(top + 1);
        let page = Page::build(h.address_shown());
        for (i, line) in page.lines().iter().skip(h.scroll()).take(body_rows).enumerate() {
            self.front.put_str(0, top + i, &line.text, tone_color(line.tone), Color::Reset);
        }

        let bottom = self.front.height.saturating_sub(1);
        match h.toast() {
            Some(toast) => {
                self.front.fill_row(bottom, TOAST_BG);
                self.front.put_centered(bottom, toast, Color::Black, TOAST_BG);
            }
            None => {
                let help = " ↑↓:Scroll  1-3:Jump  X:Address  C:Copy  B:Credits  M:Music  Esc/Q:Quit";
                self.front.put_str(0, bottom, help, Color::DarkGrey, Color::Reset);
            }
        }

        if h.dialog_open() {
            self.compose_dialog();
        }
    }

    fn compose_dialog(&mut self) {
        let lines = [
            "",
            "Welcome to the farm!",
            "",
            "Play some music while you look around?",
            "",
            "[Enter] Play music      [Esc] No thanks",
            "",
        ];
        let box_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 6;
        let left = centered(self.front.width, &" ".repeat(box_w));
        let top = self.front.height.saturating_sub(lines.len()) / 2;
        for (i, line) in lines.iter().enumerate() {
            for dx in 0..box_w {
                self.front.set(left + dx, top + i, Cell::from_char(' ', Color::White, HUD_BG));
            }
            self.front.put_centered(top + i, line, if i == 1 { GOLD } else { Color::White }, HUD_BG);
        }
    }

    // ── Credits screen ──

    fn compose_credits(&mut self, c: &CreditsScreen) {
        self.front.put_centered(1, "Behind the Scenes", GOLD, Color::Reset);

        if c.text_visible() {
            let mut row = 3;
            for credit in CREDITS {
                self.front.put_centered(row, credit.label, GREEN, Color::Reset);
                self.front.put_centered(row + 1, credit.caption, Color::White, Color::Reset);
                row += 3;
            }
        }

        // The cloud sits on top of the text until it clears.
        if c.fog_visible() {
            let rows = self.front.height.saturating_sub(4);
            for y in 3..3 + rows.min(12) {
                for x in 0..self.front.width {
                    // Light texture so text underneath reads as "behind the cloud".
                    if (x + y) % 3 != 0 {
                        self.front.set(x, y, Cell::from_char('░', FOG_FG, FOG_BG));
                    }
                }
            }
        }

        let bottom = self.front.height.saturating_sub(1);
        let help = format!(" Esc:Home  M:Music [{}]", music_label(c.music_playing()));
        self.front.put_str(0, bottom, &help, Color::DarkGrey, Color::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farm_arrows_sit_outside_the_grid() {
        let maze = Maze::farm().unwrap();
        assert_eq!(border_arrow(&maze, maze.entrance(), true), Some((-1, 1, '→')));
        assert_eq!(border_arrow(&maze, maze.exit(), false), Some((17, 1, '→')));
    }

    #[test]
    fn top_border_arrows_point_vertically() {
        let maze = Maze::parse("#S#\n#.#\n#E#").unwrap();
        assert_eq!(border_arrow(&maze, maze.entrance(), true), Some((1, -1, '↓')));
        assert_eq!(border_arrow(&maze, maze.exit(), false), Some((1, 3, '↓')));
    }

    #[test]
    fn farm_footprint_fits_the_default_minimum() {
        let (cols, rows) = maze_footprint(&Maze::farm().unwrap());
        assert_eq!((cols, rows), (40, 16));
        assert!(cols <= 72 && rows <= 16);
    }

    #[test]
    fn put_str_clips_at_the_edge() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.put_str(2, 0, "abcd", Color::White, Color::Reset);
        assert_eq!(buf.get(2, 0).as_str(), "a");
        assert_eq!(buf.get(3, 0).as_str(), "b");
    }

    #[test]
    fn centered_handles_overlong_text() {
        assert_eq!(centered(10, "abcd"), 3);
        assert_eq!(centered(2, "abcd"), 0);
    }
}
