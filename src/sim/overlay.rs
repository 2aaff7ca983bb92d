/// Timed overlay for the credits screen: a cloud covers the page on
/// mount, the text fades in underneath while the cloud is still up, then
/// the cloud clears. Same cancellable-timer pattern as the sequencer,
/// without any hand-off.

use std::time::{Duration, Instant};

use super::timer::TimerSet;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Cue {
    ShowText,
    ClearFog,
}

#[derive(Debug)]
pub struct TimedOverlay {
    fog: bool,
    text: bool,
    timers: TimerSet<Cue>,
}

impl TimedOverlay {
    /// Mount with the fog up. `text_after` should be shorter than
    /// `fog_for` so the two overlap.
    pub fn mount(now: Instant, fog_for: Duration, text_after: Duration) -> Self {
        let mut timers = TimerSet::new();
        timers.schedule(now, fog_for, Cue::ClearFog);
        timers.schedule(now, text_after, Cue::ShowText);
        TimedOverlay { fog: true, text: false, timers }
    }

    pub fn fog_visible(&self) -> bool {
        self.fog
    }

    pub fn text_visible(&self) -> bool {
        self.text
    }

    /// Returns true if anything visible changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self.timers.take_due(now);
        for cue in &due {
            match cue {
                Cue::ShowText => self.text = true,
                Cue::ClearFog => self.fog = false,
            }
        }
        !due.is_empty()
    }

    pub fn teardown(&mut self) -> usize {
        self.timers.cancel_all()
    }
}
