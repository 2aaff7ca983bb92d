/// Maze model: a fixed rectangular grid of cells, read-only after load.
///
/// ## Sources:
///   1. Built-in farm literal (`FARM_MAZE`, numeric codes)
///   2. Maze text file (`--maze` / `general.maze_file`)
///
/// ## Text format:
///   One row per line. Blank lines and lines starting with `;` are skipped.
///
/// ## Cell legend:
///   '#' or '0' = Corn (blocked)     '.' or '1' = Dirt path
///   'S' or '2' = Farm entrance      'E' or '3' = Farm exit
///
/// Entrance and exit coordinates are derived from the grid at
/// construction, never hard-coded. The win check reads `exit()`, so an
/// edited literal keeps the two in lockstep.

use std::collections::VecDeque;

use thiserror::Error;

use super::cell::Cell;
use super::entity::{Direction, Position};

/// The farm maze shown on the entry screen.
pub const FARM_MAZE: [[u8; 17]; 11] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 3],
    [0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0],
    [0, 1, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unknown cell {ch:?} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, ch: char },
    #[error("unknown cell code {code} at row {row}, column {col}")]
    UnknownCode { row: usize, col: usize, code: u8 },
    #[error("maze has no {0}")]
    Missing(&'static str),
    #[error("maze has more than one {what}: {first} and {second}")]
    Duplicate { what: &'static str, first: Position, second: Position },
    #[error("{what} at {at} is not on the border")]
    NotOnBorder { what: &'static str, at: Position },
    #[error("no walkable path from entrance {entrance} to exit {exit}")]
    Unreachable { entrance: Position, exit: Position },
}

#[derive(Clone, Debug)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    entrance: Position,
    exit: Position,
}

impl Maze {
    /// The built-in farm maze.
    pub fn farm() -> Result<Maze, MazeError> {
        let rows: Vec<&[u8]> = FARM_MAZE.iter().map(|r| r.as_slice()).collect();
        Maze::from_codes(&rows)
    }

    /// Build from numeric cell codes (see `Cell::from_code`).
    pub fn from_codes(rows: &[&[u8]]) -> Result<Maze, MazeError> {
        let mut grid = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let cells = row
                .iter()
                .enumerate()
                .map(|(x, &code)| {
                    Cell::from_code(code).ok_or(MazeError::UnknownCode { row: y, col: x, code })
                })
                .collect::<Result<Vec<_>, _>>()?;
            grid.push(cells);
        }
        Maze::from_rows(grid)
    }

    /// Parse the text format described in the module docs.
    pub fn parse(text: &str) -> Result<Maze, MazeError> {
        let mut grid = Vec::new();
        for line in text.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with(';') {
                continue;
            }
            let y = grid.len();
            let cells = line
                .chars()
                .enumerate()
                .map(|(x, ch)| Cell::from_char(ch).ok_or(MazeError::UnknownCell { row: y, col: x, ch }))
                .collect::<Result<Vec<_>, _>>()?;
            grid.push(cells);
        }
        Maze::from_rows(grid)
    }

    fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Maze, MazeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if height == 0 || width == 0 {
            return Err(MazeError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut entrance: Option<Position> = None;
        let mut exit: Option<Position> = None;

        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::Ragged { row: y, expected: width, found: row.len() });
            }
            for (x, cell) in row.into_iter().enumerate() {
                let here = Position::new(x, y);
                let slot = match cell {
                    Cell::Entrance => Some((&mut entrance, "entrance")),
                    Cell::Exit => Some((&mut exit, "exit")),
                    _ => None,
                };
                if let Some((slot, what)) = slot {
                    if let Some(first) = *slot {
                        return Err(MazeError::Duplicate { what, first, second: here });
                    }
                    *slot = Some(here);
                }
                cells.push(cell);
            }
        }

        let entrance = entrance.ok_or(MazeError::Missing("entrance"))?;
        let exit = exit.ok_or(MazeError::Missing("exit"))?;

        let maze = Maze { width, height, cells, entrance, exit };
        for (what, at) in [("entrance", entrance), ("exit", exit)] {
            if !maze.on_border(at) {
                return Err(MazeError::NotOnBorder { what, at });
            }
        }
        if maze.shortest_path().is_none() {
            return Err(MazeError::Unreachable { entrance, exit });
        }
        Ok(maze)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn entrance(&self) -> Position {
        self.entrance
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    /// Cell at signed coordinates. Out of range reads as `Blocked`.
    #[inline]
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Cell::Blocked;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// In-bounds, non-blocked target for a move, if any.
    pub fn enterable(&self, x: i32, y: i32) -> Option<Position> {
        if self.cell_at(x, y).is_walkable() {
            Some(Position::new(x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn on_border(&self, p: Position) -> bool {
        p.x == 0 || p.y == 0 || p.x + 1 == self.width || p.y + 1 == self.height
    }

    /// Breadth-first shortest walk from entrance to exit, both inclusive.
    pub fn shortest_path(&self) -> Option<Vec<Position>> {
        let mut prev: Vec<Option<Position>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let idx = |p: Position| p.y * self.width + p.x;

        let mut queue = VecDeque::new();
        seen[idx(self.entrance)] = true;
        queue.push_back(self.entrance);

        while let Some(cur) = queue.pop_front() {
            if cur == self.exit {
                let mut path = vec![cur];
                let mut at = cur;
                while let Some(p) = prev[idx(at)] {
                    path.push(p);
                    at = p;
                }
                path.reverse();
                return Some(path);
            }
            for dir in Direction::ALL {
                let (nx, ny) = cur.step(dir);
                if let Some(next) = self.enterable(nx, ny) {
                    if !seen[idx(next)] {
                        seen[idx(next)] = true;
                        prev[idx(next)] = Some(cur);
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farm_maze_derives_entrance_and_exit() {
        let maze = Maze::farm().unwrap();
        assert_eq!(maze.width(), 17);
        assert_eq!(maze.height(), 11);
        assert_eq!(maze.entrance(), Position::new(0, 1));
        assert_eq!(maze.exit(), Position::new(16, 1));
    }

    #[test]
    fn farm_maze_topology_matches_literal() {
        let maze = Maze::farm().unwrap();
        for (y, row) in FARM_MAZE.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let walkable = maze.cell_at(x as i32, y as i32).is_walkable();
                assert_eq!(walkable, code != 0, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn farm_maze_shortest_path_is_28_moves() {
        let maze = Maze::farm().unwrap();
        let path = maze.shortest_path().unwrap();
        assert_eq!(path.first(), Some(&maze.entrance()));
        assert_eq!(path.last(), Some(&maze.exit()));
        assert_eq!(path.len() - 1, 28);
    }

    #[test]
    fn out_of_range_reads_blocked() {
        let maze = Maze::farm().unwrap();
        assert_eq!(maze.cell_at(-1, 1), Cell::Blocked);
        assert_eq!(maze.cell_at(17, 1), Cell::Blocked);
        assert_eq!(maze.cell_at(0, -1), Cell::Blocked);
        assert_eq!(maze.cell_at(0, 11), Cell::Blocked);
        assert_eq!(maze.enterable(-1, 1), None);
    }

    #[test]
    fn parse_text_maze() {
        let maze = Maze::parse(
            "; tiny\n\
             #####\n\
             S...E\n\
             #####\n",
        )
        .unwrap();
        assert_eq!(maze.width(), 5);
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.entrance(), Position::new(0, 1));
        assert_eq!(maze.exit(), Position::new(4, 1));
    }

    #[test]
    fn parse_accepts_digit_codes() {
        let maze = Maze::parse("000\n213\n000").unwrap();
        assert_eq!(maze.cell_at(1, 1), Cell::Walkable);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Maze::parse("#####\nS..E\n#####").unwrap_err();
        assert_eq!(err, MazeError::Ragged { row: 1, expected: 5, found: 4 });
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = Maze::parse("S.x.E").unwrap_err();
        assert_eq!(err, MazeError::UnknownCell { row: 0, col: 2, ch: 'x' });
    }

    #[test]
    fn rejects_missing_exit() {
        assert_eq!(Maze::parse("S...").unwrap_err(), MazeError::Missing("exit"));
    }

    #[test]
    fn rejects_second_entrance() {
        let err = Maze::parse("S.S.E").unwrap_err();
        assert!(matches!(err, MazeError::Duplicate { what: "entrance", .. }));
    }

    #[test]
    fn rejects_interior_exit() {
        let err = Maze::parse(
            "#####\n\
             S.E.#\n\
             #####",
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::NotOnBorder { what: "exit", .. }));
    }

    #[test]
    fn rejects_disconnected_maze() {
        let err = Maze::parse(
            "#####\n\
             S.#.E\n\
             #####",
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::Unreachable { .. }));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Maze::parse("; nothing\n\n").unwrap_err(), MazeError::Empty);
    }
}
