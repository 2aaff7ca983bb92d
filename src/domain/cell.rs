/// Maze cell kinds and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Blocked,   // Corn; never enterable
    Walkable,  // Dirt path
    Entrance,  // Start cell, walkable
    Exit,      // Win cell, walkable
}

impl Cell {
    /// Can the player occupy this cell?
    pub fn is_walkable(self) -> bool {
        !matches!(self, Cell::Blocked)
    }

    /// Decode the numeric cell code used by the built-in literal.
    /// 0 = corn, 1 = path, 2 = entrance, 3 = exit.
    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Blocked),
            1 => Some(Cell::Walkable),
            2 => Some(Cell::Entrance),
            3 => Some(Cell::Exit),
            _ => None,
        }
    }

    /// Decode a character from a maze text file.
    /// Accepts both the symbolic legend and the digit codes.
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            '#' | '0' => Some(Cell::Blocked),
            '.' | '1' => Some(Cell::Walkable),
            'S' | '2' => Some(Cell::Entrance),
            'E' | '3' => Some(Cell::Exit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_blocked_is_impassable() {
        assert!(!Cell::Blocked.is_walkable());
        assert!(Cell::Walkable.is_walkable());
        assert!(Cell::Entrance.is_walkable());
        assert!(Cell::Exit.is_walkable());
    }

    #[test]
    fn codes_and_chars_agree() {
        for (code, ch) in [(0u8, '#'), (1, '.'), (2, 'S'), (3, 'E')] {
            assert_eq!(Cell::from_code(code), Cell::from_char(ch));
        }
        assert_eq!(Cell::from_code(4), None);
        assert_eq!(Cell::from_char('x'), None);
    }
}
