/// Client classification, decided once at startup.
///
/// Interactive clients get the maze. Compact clients (a terminal below the
/// configured minimum or too small for the loaded maze, or `--compact`) go
/// straight to the home screen and never build a navigation controller.

use crate::config::ClientConfig;
use crate::sim::route::Route;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClientClass {
    Interactive,
    Compact,
}

impl ClientClass {
    /// `needs` is the (cols, rows) the maze screen takes for this maze.
    pub fn classify(cols: u16, rows: u16, needs: (usize, usize), forced_compact: bool, cfg: &ClientConfig) -> Self {
        let too_small = cols < cfg.min_cols
            || rows < cfg.min_rows
            || (cols as usize) < needs.0
            || (rows as usize) < needs.1;
        if forced_compact || too_small {
            ClientClass::Compact
        } else {
            ClientClass::Interactive
        }
    }

    /// First screen for this client.
    pub fn entry_route(self) -> Route {
        match self {
            ClientClass::Interactive => Route::Maze,
            ClientClass::Compact => Route::Home,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ClientConfig {
        ClientConfig { min_cols: 72, min_rows: 16 }
    }

    const FARM: (usize, usize) = (40, 16);

    #[test]
    fn roomy_terminal_gets_the_maze() {
        let class = ClientClass::classify(120, 40, FARM, false, &cfg());
        assert_eq!(class, ClientClass::Interactive);
        assert_eq!(class.entry_route(), Route::Maze);
    }

    #[test]
    fn small_terminal_skips_to_home() {
        assert_eq!(ClientClass::classify(60, 40, FARM, false, &cfg()).entry_route(), Route::Home);
        assert_eq!(ClientClass::classify(120, 10, FARM, false, &cfg()).entry_route(), Route::Home);
    }

    #[test]
    fn forced_compact_wins() {
        assert_eq!(ClientClass::classify(200, 60, FARM, true, &cfg()), ClientClass::Compact);
    }

    #[test]
    fn oversized_maze_falls_back_to_home() {
        // 60 wide needs 4 + 61 * 2 columns; 30 tall needs 35 rows.
        let big = (126, 35);
        assert_eq!(ClientClass::classify(120, 40, big, false, &cfg()), ClientClass::Compact);
        assert_eq!(ClientClass::classify(130, 34, big, false, &cfg()), ClientClass::Compact);
        assert_eq!(ClientClass::classify(130, 40, big, false, &cfg()), ClientClass::Interactive);
    }
}
