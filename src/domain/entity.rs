/// Positions and facing for the player on the maze grid.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step (dx, dy) for this direction. Y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Neighbor one step in `dir`, as signed coordinates.
    /// May be out of range; the maze decides what that means.
    pub fn step(self, dir: Direction) -> (i32, i32) {
        let (dx, dy) = dir.delta();
        (self.x as i32 + dx, self.y as i32 + dy)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_left_from_origin_goes_negative() {
        assert_eq!(Position::new(0, 1).step(Direction::Left), (-1, 1));
    }

    #[test]
    fn step_down_increases_y() {
        assert_eq!(Position::new(3, 3).step(Direction::Down), (3, 4));
    }
}
