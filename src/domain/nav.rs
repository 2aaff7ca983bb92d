/// Navigation controller: the player's cell, facing, and move validation.
///
/// Turn-then-step semantics: every request turns the player to face the
/// requested direction, even when the step itself is rejected. This lets
/// the renderer show a "bump in place".

use super::entity::{Direction, Position};
use super::maze::Maze;

/// Result of a single move request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Step accepted; position changed.
    Moved { from: Position, to: Position },
    /// Wall or map edge in the way; only facing changed.
    Bumped { at: Position },
    /// Controller is locked after the win; only facing changed.
    Locked,
}

impl MoveOutcome {
    #[cfg(test)]
    pub fn moved(self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

#[derive(Clone, Debug)]
pub struct NavigationController {
    position: Position,
    direction: Direction,
    locked: bool,
}

impl NavigationController {
    /// Mount at the maze entrance, facing down.
    pub fn new(maze: &Maze) -> Self {
        NavigationController {
            position: maze.entrance(),
            direction: Direction::Down,
            locked: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Freeze movement. There is no unlock; a new mount builds a new controller.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn at_exit(&self, maze: &Maze) -> bool {
        self.position == maze.exit()
    }

    pub fn try_move(&mut self, maze: &Maze, dir: Direction) -> MoveOutcome {
        self.direction = dir;
        if self.locked {
            return MoveOutcome::Locked;
        }

        let (nx, ny) = self.position.step(dir);
        match maze.enterable(nx, ny) {
            Some(to) => {
                let from = self.position;
                self.position = to;
                MoveOutcome::Moved { from, to }
            }
            None => MoveOutcome::Bumped { at: self.position },
        }
    }
}
