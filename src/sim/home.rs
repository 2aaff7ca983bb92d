/// Home screen state: the text rendition of the $GURU marketing page.
///
/// On mount a welcome dialog asks whether to play music (Enter plays,
/// Esc dismisses). Afterwards the page scrolls, the header hides while
/// scrolling down, the contract address can be revealed and "copied"
/// (shown as a short toast), `1`..`3` jump to the page sections, and `B`
/// opens Behind the Scenes.

use std::time::{Duration, Instant};

use tracing::info;

use crate::domain::entity::Direction;
use crate::ui::audio::AudioCompanion;
use super::command::Command;
use super::event::MazeEvent;
use super::route::{Route, Router};
use super::timer::{TimerId, TimerSet};

pub const TOKEN: &str = "$GURU";
pub const CONTRACT_ADDRESS: &str = "3VWGMLE5VBTDVYFBNFIK4GZPSTMSCBR52HTBPZZPPUMP";
pub const COPIED_TOAST: &str = "Contract Address Copied to the ClipBoard";

/// Lines scrolled before the header may hide.
const HEADER_HIDE_AFTER: usize = 3;

pub const LINKS: &[(&str, &str)] = &[
    ("Dexscreener", "https://dexscreener.com/solana/4EGX5GjGsFtpKRRaSdQv1bwuAAybYh3AbmfRuuyZTPxP"),
    ("X", "https://x.com/gurucabbage"),
    ("Telegram", "https://t.me/guru_buds_weed_farm"),
];

pub const CHART_URL: &str =
    "https://dexscreener.com/injective/0xd9089235d2c1b07261cbb2071f4f5a7f92fa1eca940e3cad88bb671c288a972f";

pub struct Allocation {
    pub name: &'static str,
    pub percent: u8,
    pub description: &'static str,
}

pub const TOKENOMICS: &[Allocation] = &[
    Allocation { name: "Pump.fun Tokens", percent: 77, description: "Available during the fair launch." },
    Allocation { name: "Burned", percent: 7, description: "Tokens removed from circulation forever." },
    Allocation { name: "Humane Society / Cat Shelters", percent: 5, description: "Donations to help our furry friends." },
    Allocation { name: "Dev Team", percent: 4, description: "Vested to ensure long-term commitment." },
    Allocation { name: "Marketing", percent: 3, description: "To spread the word of Pumpkin." },
    Allocation { name: "Airdrops", percent: 2, description: "Rewards for the community." },
    Allocation { name: "Pumpkin the Cat", percent: 1, description: "For food, treats, and litter." },
];

pub struct Phase {
    pub title: &'static str,
    pub done: bool,
    pub items: &'static [&'static str],
}

pub const ROADMAP: &[Phase] = &[
    Phase {
        title: "Phase 1: The Launch",
        done: true,
        items: &[
            "GURU introduced as the new face of cozy P2E gaming",
            "Branding locked in: artwork, memes, pixel aesthetic, full identity",
            "Website goes live with clean visuals + clear mission",
            "Verified X profile secured",
            "Telegram surges as followers pile in for the GURU takeover",
        ],
    },
    Phase {
        title: "Phase 2: The Growth",
        done: false,
        items: &[
            "Official token launch on Pump.fun",
            "Meme pushes, raid teams, and social exposure campaigns",
            "Enhanced token info on Dexscreener",
            "Listings on trackers + visibility integrations",
            "Collabs, partnerships, and expansion of the $GURU lore",
            "Strategic content drops + daily community engagement",
        ],
    },
    Phase {
        title: "Phase 3: The Takeover",
        done: false,
        items: &[
            "GURU becomes a recognizable symbol across Solana culture",
            "Coordinated raids, campaigns, and high-impact community initiatives",
            "Ecosystem utilities & integrations rolled out as the project scales",
            "Continued growth through partnerships, content, and community strength",
            "$GURU solidifies itself as a top-tier meme force",
        ],
    },
];

pub const HOW_TO_BUY: &[(&str, &str)] = &[
    ("1. CREATE A WALLET", "Download a crypto wallet and keep your seed phrase safer than a high score."),
    ("2. GET SOME SOL", "You'll need some SOL in your wallet to swap for $GURU."),
    ("3. SWAP FOR $GURU", "Go to PumpFun, paste the contract address, and swap. Welcome to the farm."),
];

/// Sections the header links jump to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Section {
    HowToBuy,
    Roadmap,
    Chart,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::HowToBuy, Section::Roadmap, Section::Chart];

    pub fn label(self) -> &'static str {
        match self {
            Section::HowToBuy => "How To Buy",
            Section::Roadmap => "Roadmap",
            Section::Chart => "Chart",
        }
    }
}

/// How a page line is meant to look; the renderer picks the colours.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tone {
    Plain,
    Heading,
    Muted,
    Highlight,
}

pub struct PageLine {
    pub text: String,
    pub tone: Tone,
}

/// The scrollable body of the home page, one line per terminal row.
pub struct Page {
    lines: Vec<PageLine>,
    anchors: Vec<(Section, usize)>,
}

impl Page {
    pub fn build(address_shown: bool) -> Page {
        let mut page = Page { lines: Vec::new(), anchors: Vec::new() };

        page.push(format!("  Welcome to {TOKEN}: the cozy farm on Solana."), Tone::Plain);
        page.blank();
        // Same height either way so anchors don't move.
        if address_shown {
            page.push(format!("  CA: {CONTRACT_ADDRESS}"), Tone::Highlight);
        } else {
            page.push("  CA: [X] show   [C] copy".to_string(), Tone::Muted);
        }
        page.blank();

        page.push("  LINKS".to_string(), Tone::Heading);
        for (name, url) in LINKS {
            page.push(format!("  {name:<12} {url}"), Tone::Plain);
        }
        page.blank();

        page.push("  TOKENOMICS".to_string(), Tone::Heading);
        for a in TOKENOMICS {
            let bar = "█".repeat((a.percent as usize).div_ceil(4));
            page.push(format!("  {:>3}% {:<20} {}", a.percent, bar, a.name), Tone::Plain);
            page.push(format!("        {}", a.description), Tone::Muted);
        }
        page.blank();

        page.anchor(Section::HowToBuy);
        page.push("  HOW TO BUY".to_string(), Tone::Heading);
        for (step, text) in HOW_TO_BUY {
            page.push(format!("  {step}"), Tone::Plain);
            page.push(format!("      {text}"), Tone::Muted);
        }
        page.blank();

        page.anchor(Section::Roadmap);
        page.push("  ROADMAP".to_string(), Tone::Heading);
        for phase in ROADMAP {
            let mark = if phase.done { "✔" } else { "○" };
            let tone = if phase.done { Tone::Highlight } else { Tone::Plain };
            page.push(format!("  {mark} {}", phase.title), tone);
            for item in phase.items {
                page.push(format!("      · {item}"), Tone::Muted);
            }
        }
        page.blank();

        page.anchor(Section::Chart);
        page.push("  LIVE CHART".to_string(), Tone::Heading);
        page.push(format!("  {CHART_URL}"), Tone::Plain);
        page
    }

    pub fn lines(&self) -> &[PageLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// First line of a section.
    pub fn anchor_of(&self, section: Section) -> usize {
        self.anchors
            .iter()
            .find(|(s, _)| *s == section)
            .map_or(0, |(_, line)| *line)
    }

    fn push(&mut self, text: String, tone: Tone) {
        self.lines.push(PageLine { text, tone });
    }

    fn blank(&mut self) {
        self.push(String::new(), Tone::Plain);
    }

    fn anchor(&mut self, section: Section) {
        self.anchors.push((section, self.lines.len()));
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Cue {
    HideToast,
}

pub struct HomeScreen {
    audio: AudioCompanion,
    dialog_open: bool,
    address_shown: bool,
    toast: Option<&'static str>,
    toast_timer: Option<TimerId>,
    toast_for: Duration,
    scroll: usize,
    /// Last line that may sit at the top of the view.
    max_scroll: usize,
    header_visible: bool,
    timers: TimerSet<Cue>,
}

impl HomeScreen {
    pub fn mount(audio: AudioCompanion, toast_for: Duration) -> Self {
        HomeScreen {
            audio,
            dialog_open: true,
            address_shown: false,
            toast: None,
            toast_timer: None,
            toast_for,
            scroll: 0,
            max_scroll: Page::build(false).len().saturating_sub(1),
            header_visible: true,
            timers: TimerSet::new(),
        }
    }

    pub fn dialog_open(&self) -> bool { self.dialog_open }
    pub fn address_shown(&self) -> bool { self.address_shown }
    pub fn toast(&self) -> Option<&'static str> { self.toast }
    pub fn scroll(&self) -> usize { self.scroll }
    pub fn header_visible(&self) -> bool { self.header_visible }
    pub fn music_playing(&self) -> bool { self.audio.playing() }

    pub fn handle<R: Router + ?Sized>(&mut self, cmd: Command, now: Instant, router: &mut R) -> Vec<MazeEvent> {
        let mut events = Vec::new();

        if self.dialog_open {
            match cmd {
                Command::Confirm => {
                    self.dialog_open = false;
                    let playing = self.audio.play();
                    events.push(MazeEvent::AudioChanged { playing });
                }
                Command::Back => self.dialog_open = false,
                _ => {}
            }
            return events;
        }

        match cmd {
            Command::Move(Direction::Down) => self.scroll_to(self.scroll + 1),
            Command::Move(Direction::Up) => self.scroll_to(self.scroll.saturating_sub(1)),
            Command::JumpTo(section) => {
                let line = Page::build(self.address_shown).anchor_of(section);
                self.scroll_to(line);
            }
            Command::ShowAddress => self.address_shown = true,
            Command::CopyAddress => {
                self.address_shown = true;
                self.show_toast(COPIED_TOAST, now);
            }
            Command::ToggleMute => {
                let playing = self.audio.toggle();
                events.push(MazeEvent::AudioChanged { playing });
            }
            Command::OpenCredits => {
                router.navigate_to(Route::Credits);
                events.push(MazeEvent::Navigated(Route::Credits));
            }
            _ => {}
        }
        events
    }

    pub fn tick(&mut self, now: Instant) {
        for cue in self.timers.take_due(now) {
            match cue {
                Cue::HideToast => {
                    self.toast = None;
                    self.toast_timer = None;
                }
            }
        }
    }

    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.audio.stop();
    }

    fn show_toast(&mut self, text: &'static str, now: Instant) {
        // A fresh toast restarts the countdown.
        if let Some(id) = self.toast_timer.take() {
            self.timers.cancel(id);
        }
        self.toast = Some(text);
        self.toast_timer = Some(self.timers.schedule(now, self.toast_for, Cue::HideToast));
        info!(toast = text, "toast");
    }

    fn scroll_to(&mut self, next: usize) {
        let next = next.min(self.max_scroll);
        if next > self.scroll && next > HEADER_HIDE_AFTER {
            self.header_visible = false;
        } else if next < self.scroll {
            self.header_visible = true;
        }
        self.scroll = next;
    }
}

impl Drop for HomeScreen {
    fn drop(&mut self) {
        self.teardown();
    }
}
