/// MazeSession: everything that lives for one visit to the maze screen.
///
/// Owns the navigation controller, the transition sequencer, the screen's
/// music and a timer set for deferred work (the delayed music start).
/// Input is applied strictly in arrival order; each accepted move raises a
/// position-changed notification that the sequencer inspects.
///
/// `teardown` must run when the screen is left. After it, no timer fires,
/// the router is never called, and music is paused.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::maze::Maze;
use crate::domain::nav::{MoveOutcome, NavigationController};
use crate::ui::audio::AudioCompanion;
use super::command::Command;
use super::event::MazeEvent;
use super::route::Router;
use super::sequencer::{TransitionSequencer, TransitionState};
use super::timer::TimerSet;

/// How long a bump stays visible.
const BUMP_FLASH: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Deferred {
    StartMusic,
}

pub struct MazeSession {
    nav: NavigationController,
    sequencer: TransitionSequencer,
    audio: AudioCompanion,
    timers: TimerSet<Deferred>,
    last_bump: Option<Instant>,
    moves: u32,
    torn_down: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct SessionTiming {
    pub fog_to_message: Duration,
    pub message_to_home: Duration,
    pub audio_start_delay: Duration,
}

impl MazeSession {
    pub fn mount(maze: &Maze, timing: SessionTiming, audio: AudioCompanion, now: Instant) -> Self {
        let mut timers = TimerSet::new();
        timers.schedule(now, timing.audio_start_delay, Deferred::StartMusic);
        info!(entrance = %maze.entrance(), exit = %maze.exit(), "maze mounted");

        MazeSession {
            nav: NavigationController::new(maze),
            sequencer: TransitionSequencer::new(timing.fog_to_message, timing.message_to_home),
            audio,
            timers,
            last_bump: None,
            moves: 0,
            torn_down: false,
        }
    }

    pub fn nav(&self) -> &NavigationController {
        &self.nav
    }

    pub fn state(&self) -> TransitionState {
        self.sequencer.state()
    }

    pub fn music_playing(&self) -> bool {
        self.audio.playing()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn bumping(&self, now: Instant) -> bool {
        self.last_bump
            .map_or(false, |t| now.saturating_duration_since(t) < BUMP_FLASH)
    }

    pub fn handle(&mut self, maze: &Maze, cmd: Command, now: Instant) -> Vec<MazeEvent> {
        let mut events = Vec::new();
        if self.torn_down {
            return events;
        }

        match cmd {
            Command::Move(dir) => match self.nav.try_move(maze, dir) {
                MoveOutcome::Moved { from, to } => {
                    self.moves += 1;
                    debug!(%from, %to, "moved");
                    events.push(MazeEvent::PositionChanged { from, to });
                    if let Some(state) = self.sequencer.on_position_changed(&mut self.nav, maze, now) {
                        events.push(MazeEvent::Transition(state));
                    }
                }
                MoveOutcome::Bumped { at } => {
                    debug!(%at, ?dir, "bumped");
                    self.last_bump = Some(now);
                    events.push(MazeEvent::Bumped { at });
                }
                MoveOutcome::Locked => {}
            },
            Command::ToggleMute => {
                let playing = self.audio.toggle();
                events.push(MazeEvent::AudioChanged { playing });
            }
            _ => {}
        }
        events
    }

    /// Fire due timers. Navigation requests go to `router`.
    pub fn tick<R: Router + ?Sized>(&mut self, now: Instant, router: &mut R) -> Vec<MazeEvent> {
        let mut events = Vec::new();
        if self.torn_down {
            return events;
        }

        for job in self.timers.take_due(now) {
            match job {
                Deferred::StartMusic => {
                    let playing = self.audio.autoplay();
                    events.push(MazeEvent::AudioChanged { playing });
                }
            }
        }

        for state in self.sequencer.poll(now, router) {
            events.push(MazeEvent::Transition(state));
        }
        events
    }

    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let cancelled = self.sequencer.teardown() + self.timers.cancel_all();
        self.audio.stop();
        info!(cancelled, state = ?self.sequencer.state(), moves = self.moves, "maze torn down");
    }
}

impl Drop for MazeSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Direction, Position};
    use crate::sim::route::{Route, RouteQueue};
    use crate::ui::audio::testing::ScriptedOutput;
    use crate::ui::audio::PlaybackError;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn timing() -> SessionTiming {
        SessionTiming {
            fog_to_message: ms(500),
            message_to_home: ms(3000),
            audio_start_delay: ms(100),
        }
    }

    fn mount(maze: &Maze, out: ScriptedOutput, now: Instant) -> MazeSession {
        MazeSession::mount(maze, timing(), AudioCompanion::new(Box::new(out), true), now)
    }

    /// Directions along the maze's shortest path.
    fn solution(maze: &Maze) -> Vec<Direction> {
        let path = maze.shortest_path().unwrap();
        path.windows(2)
            .map(|w| {
                let (a, b) = (w[0], w[1]);
                Direction::ALL
                    .into_iter()
                    .find(|d| a.step(*d) == (b.x as i32, b.y as i32))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn solving_the_farm_goes_home_after_fog_and_message() {
        let maze = Maze::farm().unwrap();
        let t0 = Instant::now();
        let mut s = mount(&maze, ScriptedOutput::accepting(), t0);
        let mut router = RouteQueue::new();

        let mut won = Vec::new();
        for dir in solution(&maze) {
            for ev in s.handle(&maze, Command::Move(dir), t0) {
                if let MazeEvent::Transition(st) = ev {
                    won.push(st);
                }
            }
        }
        assert_eq!(won, vec![TransitionState::Won]);
        assert_eq!(s.nav().position(), maze.exit());
        assert_eq!(s.moves(), 28);

        s.tick(t0 + ms(500), &mut router);
        assert_eq!(s.state(), TransitionState::ShowingMessage);
        assert!(router.requests().is_empty());

        s.tick(t0 + ms(3500), &mut router);
        assert_eq!(s.state(), TransitionState::NavigatingAway);
        assert_eq!(router.requests(), &[Route::Home]);
    }

    #[test]
    fn moves_after_win_are_ignored() {
        let maze = Maze::farm().unwrap();
        let t0 = Instant::now();
        let mut s = mount(&maze, ScriptedOutput::accepting(), t0);
        for dir in solution(&maze) {
            s.handle(&maze, Command::Move(dir), t0);
        }
        let events = s.handle(&maze, Command::Move(Direction::Left), t0);
        assert!(events.is_empty());
        assert_eq!(s.nav().position(), maze.exit());
        assert_eq!(s.nav().direction(), Direction::Left);
    }

    #[test]
    fn bump_is_reported_and_flashes_briefly() {
        let maze = Maze::farm().unwrap();
        let t0 = Instant::now();
        let mut s = mount(&maze, ScriptedOutput::accepting(), t0);
        let events = s.handle(&maze, Command::Move(Direction::Up), t0);
        assert_eq!(events, vec![MazeEvent::Bumped { at: Position::new(0, 1) }]);
        assert!(s.bumping(t0 + ms(100)));
        assert!(!s.bumping(t0 + ms(200)));
    }

    #[test]
    fn music_starts_after_delay() {
        let maze = Maze::farm().unwrap();
        let t0 = Instant::now();
        let mut s = mount(&maze, ScriptedOutput::accepting(), t0);
        let mut router = RouteQueue::new();
        assert!(!s.music_playing());
        s.tick(t0 + ms(50), &mut router);
        assert!(!s.music_playing());
        let events = s.tick(t0 + ms(100), &mut router);
        assert_eq!(events, vec![MazeEvent::AudioChanged { playing: true }]);
        assert!(s.music_playing());
    }

    #[test]
    fn rejected_autoplay_leaves_music_off() {
        let maze = Maze::farm().unwrap();
        let t0 = Instant::now();
        let mut s = mount(&maze, ScriptedOutput::rejecting(PlaybackError::AutoplayBlocked), t0);
        let mut router = RouteQueue::new();
        let events = s.tick(t0 + ms(100), &mut router);
        assert_eq!(events, vec![MazeEvent::AudioChanged { playing: false }]);
        assert!(!s.music_playing());
    }

    #[test]
    fn mute_toggle_reports_state() {
        let maze = Maze::farm().unwrap();
        let t0 = Instant::now();
        let mut s = mount(&maze, ScriptedOutput::accepting(), t0);
        assert_eq!(
            s.handle(&maze, Command::ToggleMute, t0),
            vec![MazeEvent::AudioChanged { playing: true }]
        );
        assert_eq!(
            s.handle(&maze, Command::ToggleMute, t0),
            vec![MazeEvent::AudioChanged { playing: false }]
        );
    }

    #[test]
    fn teardown_mid_transition_never_navigates() {
        let maze = Maze::farm().unwrap();
        let t0 = Instant::now();
        let out = ScriptedOutput::accepting();
        let calls = out.calls.clone();
        let mut s = mount(&maze, out, t0);
        let mut router = RouteQueue::new();
        for dir in solution(&maze) {
            s.handle(&maze, Command::Move(dir), t0);
        }
        s.teardown();

        assert!(s.tick(t0 + ms(10_000), &mut router).is_empty());
        assert!(router.requests().is_empty());
        assert!(!s.music_playing());
        // Music never started: only the teardown pause reached the output.
        assert_eq!(*calls.borrow(), vec!["pause"]);
    }
}
