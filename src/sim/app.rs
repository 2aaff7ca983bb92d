/// App: the current screen plus the routing between screens.
///
/// Screens never switch themselves. They post requests to the
/// `RouteQueue`; the app applies them after the current command or tick,
/// tearing the old screen down before mounting the next one.

use std::time::Instant;

use tracing::info;

use crate::config::TimingConfig;
use crate::domain::maze::Maze;
use crate::ui::audio::{AudioCompanion, Track};
use crate::ui::client::ClientClass;
use super::command::Command;
use super::credits::CreditsScreen;
use super::event::MazeEvent;
use super::home::HomeScreen;
use super::route::{Route, RouteQueue};
use super::session::{MazeSession, SessionTiming};

/// Builds the music companion for a screen.
pub type AudioFactory = Box<dyn FnMut(Track) -> AudioCompanion>;

pub enum Screen {
    Maze(MazeSession),
    Home(HomeScreen),
    Credits(CreditsScreen),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Maze(_) => Route::Maze,
            Screen::Home(_) => Route::Home,
            Screen::Credits(_) => Route::Credits,
        }
    }

    fn teardown(&mut self) {
        match self {
            Screen::Maze(s) => s.teardown(),
            Screen::Home(h) => h.teardown(),
            Screen::Credits(c) => c.teardown(),
        }
    }
}

pub struct App {
    maze: Maze,
    timing: TimingConfig,
    audio: AudioFactory,
    screen: Screen,
    routes: RouteQueue,
    quit: bool,
}

impl App {
    pub fn new(maze: Maze, timing: TimingConfig, class: ClientClass, mut audio: AudioFactory, now: Instant) -> Self {
        let entry = class.entry_route();
        info!(?class, route = %entry, "client classified");
        let screen = mount(entry, &maze, &timing, &mut audio, now);
        App { maze, timing, audio, screen, routes: RouteQueue::new(), quit: false }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle(&mut self, cmd: Command, now: Instant) -> Vec<MazeEvent> {
        // Esc leaves the app from the maze, and from home once the dialog is gone.
        let leaves = match (&self.screen, cmd) {
            (_, Command::Quit) => true,
            (Screen::Maze(_), Command::Back) => true,
            (Screen::Home(h), Command::Back) => !h.dialog_open(),
            _ => false,
        };
        if leaves {
            self.quit = true;
            return vec![];
        }

        let mut events = match &mut self.screen {
            Screen::Maze(s) => s.handle(&self.maze, cmd, now),
            Screen::Home(h) => h.handle(cmd, now, &mut self.routes),
            Screen::Credits(c) => c.handle(cmd, &mut self.routes),
        };
        self.merge_routes(&mut events, now);
        events
    }

    pub fn tick(&mut self, now: Instant) -> Vec<MazeEvent> {
        let mut events = match &mut self.screen {
            Screen::Maze(s) => s.tick(now, &mut self.routes),
            Screen::Home(h) => {
                h.tick(now);
                vec![]
            }
            Screen::Credits(c) => c.tick(now),
        };
        self.merge_routes(&mut events, now);
        events
    }

    pub fn shutdown(&mut self) {
        self.screen.teardown();
    }

    /// Apply queued navigation; each switch is reported once.
    fn merge_routes(&mut self, events: &mut Vec<MazeEvent>, now: Instant) {
        for route in self.routes.drain() {
            let from = self.screen.route();
            if route == from {
                continue;
            }
            self.screen.teardown();
            self.screen = mount(route, &self.maze, &self.timing, &mut self.audio, now);
            info!(%from, to = %route, "navigated");
            if !events.contains(&MazeEvent::Navigated(route)) {
                events.push(MazeEvent::Navigated(route));
            }
        }
    }
}

fn mount(route: Route, maze: &Maze, timing: &TimingConfig, audio: &mut AudioFactory, now: Instant) -> Screen {
    match route {
        Route::Maze => {
            let t = SessionTiming {
                fog_to_message: timing.fog_to_message(),
                message_to_home: timing.message_to_home(),
                audio_start_delay: timing.audio_start_delay(),
            };
            Screen::Maze(MazeSession::mount(maze, t, audio(Track::Landing), now))
        }
        Route::Home => Screen::Home(HomeScreen::mount(audio(Track::Home), timing.toast())),
        Route::Credits => Screen::Credits(CreditsScreen::mount(
            audio(Track::Credits),
            now,
            timing.credits_fog(),
            timing.credits_text(),
            timing.audio_start_delay(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::AppConfig;
    use crate::domain::entity::Direction;
    use crate::ui::audio::testing::ScriptedOutput;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn factory() -> AudioFactory {
        Box::new(|_track| AudioCompanion::new(Box::new(ScriptedOutput::accepting()), true))
    }

    fn app(class: ClientClass, now: Instant) -> App {
        let cfg = AppConfig::default();
        App::new(Maze::farm().unwrap(), cfg.timing, class, factory(), now)
    }

    fn solve(app: &mut App, now: Instant) {
        let path = app.maze().shortest_path().unwrap();
        for w in path.windows(2) {
            let dir = Direction::ALL
                .into_iter()
                .find(|d| w[0].step(*d) == (w[1].x as i32, w[1].y as i32))
                .unwrap();
            app.handle(Command::Move(dir), now);
        }
    }

    #[test]
    fn compact_client_never_sees_the_maze() {
        let a = app(ClientClass::Compact, Instant::now());
        assert_eq!(a.screen().route(), Route::Home);
    }

    #[test]
    fn interactive_client_starts_in_the_maze() {
        let a = app(ClientClass::Interactive, Instant::now());
        assert_eq!(a.screen().route(), Route::Maze);
    }

    #[test]
    fn solved_maze_lands_on_home() {
        let t0 = Instant::now();
        let mut a = app(ClientClass::Interactive, t0);
        solve(&mut a, t0);
        assert_eq!(a.screen().route(), Route::Maze);

        a.tick(t0 + ms(3499));
        assert_eq!(a.screen().route(), Route::Maze);
        let events = a.tick(t0 + ms(3500));
        assert!(events.contains(&MazeEvent::Navigated(Route::Home)));
        assert_eq!(a.screen().route(), Route::Home);
    }

    #[test]
    fn home_to_credits_and_back() {
        let t0 = Instant::now();
        let mut a = app(ClientClass::Compact, t0);
        a.handle(Command::Back, t0);
        a.handle(Command::OpenCredits, t0);
        assert_eq!(a.screen().route(), Route::Credits);
        a.handle(Command::Back, t0);
        assert_eq!(a.screen().route(), Route::Home);
    }

    #[test]
    fn quit_sets_flag() {
        let mut a = app(ClientClass::Compact, Instant::now());
        assert!(!a.should_quit());
        a.handle(Command::Quit, Instant::now());
        assert!(a.should_quit());
    }

    #[test]
    fn esc_on_home_dismisses_dialog_first() {
        let t0 = Instant::now();
        let mut a = app(ClientClass::Compact, t0);
        a.handle(Command::Back, t0);
        assert!(!a.should_quit());
        a.handle(Command::Back, t0);
        assert!(a.should_quit());
    }

    #[test]
    fn esc_in_maze_quits() {
        let t0 = Instant::now();
        let mut a = app(ClientClass::Interactive, t0);
        a.handle(Command::Back, t0);
        assert!(a.should_quit());
    }
}
