/// Behind the Scenes: the credits screen.
///
/// Mounts under a cloud; the credits fade in while the cloud is still
/// up, then it clears. Music auto-starts shortly after mount.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::ui::audio::AudioCompanion;
use super::command::Command;
use super::event::MazeEvent;
use super::overlay::TimedOverlay;
use super::route::{Route, Router};
use super::timer::TimerSet;

pub struct Credit {
    pub label: &'static str,
    pub caption: &'static str,
}

pub const CREDITS: &[Credit] = &[
    Credit { label: "Development Process", caption: "Created the logic for movement." },
    Credit { label: "Animation Design", caption: "Added an avatar with animations for realistic movement." },
    Credit { label: "Game Integration", caption: "Jumped into the game environment with the actual interactions." },
    Credit { label: "Behind the Scenes", caption: "We work on new ideas every day so that everyone can enjoy." },
];

pub struct CreditsScreen {
    overlay: TimedOverlay,
    audio: AudioCompanion,
    timers: TimerSet<()>,
}

impl CreditsScreen {
    pub fn mount(
        audio: AudioCompanion,
        now: Instant,
        fog_for: Duration,
        text_after: Duration,
        audio_start_delay: Duration,
    ) -> Self {
        let mut timers = TimerSet::new();
        timers.schedule(now, audio_start_delay, ());
        CreditsScreen {
            overlay: TimedOverlay::mount(now, fog_for, text_after),
            audio,
            timers,
        }
    }

    pub fn fog_visible(&self) -> bool { self.overlay.fog_visible() }
    pub fn text_visible(&self) -> bool { self.overlay.text_visible() }
    pub fn music_playing(&self) -> bool { self.audio.playing() }

    pub fn handle<R: Router + ?Sized>(&mut self, cmd: Command, router: &mut R) -> Vec<MazeEvent> {
        match cmd {
            Command::ToggleMute => {
                let playing = self.audio.toggle();
                vec![MazeEvent::AudioChanged { playing }]
            }
            Command::Back => {
                router.navigate_to(Route::Home);
                vec![MazeEvent::Navigated(Route::Home)]
            }
            _ => vec![],
        }
    }

    pub fn tick(&mut self, now: Instant) -> Vec<MazeEvent> {
        if self.overlay.poll(now) {
            debug!(fog = self.fog_visible(), text = self.text_visible(), "credits overlay");
        }
        self.timers
            .take_due(now)
            .into_iter()
            .map(|()| MazeEvent::AudioChanged { playing: self.audio.autoplay() })
            .collect()
    }

    pub fn teardown(&mut self) {
        self.overlay.teardown();
        self.timers.cancel_all();
        self.audio.stop();
    }
}

impl Drop for CreditsScreen {
    fn drop(&mut self) {
        self.teardown();
    }
}
