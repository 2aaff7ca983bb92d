/// External configuration loader.
///
/// Reads `config.toml` from `--config PATH`, else from the executable's
/// directory, the CWD, or `~/.local/share/gurufarm` (first hit wins).
/// Falls back to defaults if the file is missing or incomplete.
///
/// Logging isn't up yet while this runs, so problems are collected in
/// `warnings` and logged by the caller once the subscriber exists.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub audio: AudioConfig,
    pub client: ClientConfig,
    pub gamepad: GamepadConfig,
    pub maze_file: Option<PathBuf>,
    pub log_file: PathBuf,
    pub log_level: String,
    /// Where the config came from, if a file was read.
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub fog_to_message_ms: u64,    // D1: Won → ThankYou!
    pub message_to_home_ms: u64,   // D2: ThankYou! → home
    pub audio_start_delay_ms: u64,
    pub toast_ms: u64,
    pub credits_fog_ms: u64,
    pub credits_text_ms: u64,
}

impl TimingConfig {
    pub fn tick_rate(&self) -> Duration { Duration::from_millis(self.tick_rate_ms) }
    pub fn fog_to_message(&self) -> Duration { Duration::from_millis(self.fog_to_message_ms) }
    pub fn message_to_home(&self) -> Duration { Duration::from_millis(self.message_to_home_ms) }
    pub fn audio_start_delay(&self) -> Duration { Duration::from_millis(self.audio_start_delay_ms) }
    pub fn toast(&self) -> Duration { Duration::from_millis(self.toast_ms) }
    pub fn credits_fog(&self) -> Duration { Duration::from_millis(self.credits_fog_ms) }
    pub fn credits_text(&self) -> Duration { Duration::from_millis(self.credits_text_ms) }
}

#[derive(Clone, Debug)]
pub struct AudioConfig {
    pub enabled: bool,
    pub autoplay: bool,
    pub volume: f32,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub min_cols: u16,
    pub min_rows: u16,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub mute: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    client: TomlClient,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_fog_to_message")]
    fog_to_message_ms: u64,
    #[serde(default = "default_message_to_home")]
    message_to_home_ms: u64,
    #[serde(default = "default_audio_start_delay")]
    audio_start_delay_ms: u64,
    #[serde(default = "default_toast")]
    toast_ms: u64,
    #[serde(default = "default_credits_fog")]
    credits_fog_ms: u64,
    #[serde(default = "default_credits_text")]
    credits_text_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_true")]
    autoplay: bool,
    #[serde(default = "default_volume")]
    volume: f32,
}

#[derive(Deserialize, Debug)]
struct TomlClient {
    #[serde(default = "default_min_cols")]
    min_cols: u16,
    #[serde(default = "default_min_rows")]
    min_rows: u16,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_mute")]
    mute: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    maze_file: Option<String>,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }
fn default_fog_to_message() -> u64 { 500 }
fn default_message_to_home() -> u64 { 3000 }  // 3.5s from the win in total
fn default_audio_start_delay() -> u64 { 100 }
fn default_toast() -> u64 { 2000 }
fn default_credits_fog() -> u64 { 3000 }
fn default_credits_text() -> u64 { 2000 }    // overlaps the cloud
fn default_true() -> bool { true }
fn default_volume() -> f32 { 0.25 }
fn default_min_cols() -> u16 { 72 }
fn default_min_rows() -> u16 { 16 }
fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into(), "B".into()] }
fn default_mute() -> Vec<String> { vec!["Y".into()] }
fn default_log_file() -> String { "gurufarm.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            fog_to_message_ms: default_fog_to_message(),
            message_to_home_ms: default_message_to_home(),
            audio_start_delay_ms: default_audio_start_delay(),
            toast_ms: default_toast(),
            credits_fog_ms: default_credits_fog(),
            credits_text_ms: default_credits_text(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { enabled: true, autoplay: true, volume: default_volume() }
    }
}

impl Default for TomlClient {
    fn default() -> Self {
        TomlClient { min_cols: default_min_cols(), min_rows: default_min_rows() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            mute: default_mute(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            maze_file: None,
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Load config. An explicit path is used as-is; otherwise the
    /// candidate directories are searched for `config.toml`.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut warnings = Vec::new();
        let (toml_cfg, source) = match explicit {
            Some(path) => match read_toml(path, &mut warnings) {
                Some(cfg) => (cfg, Some(path.to_path_buf())),
                None => (TomlConfig::default(), None),
            },
            None => search_toml(&candidate_dirs(), &mut warnings),
        };
        let mut cfg = AppConfig::from_toml(toml_cfg);
        cfg.source = source;
        cfg.warnings = warnings;
        cfg
    }

    fn from_toml(t: TomlConfig) -> Self {
        AppConfig {
            timing: TimingConfig {
                tick_rate_ms: t.timing.tick_rate_ms.max(1),
                fog_to_message_ms: t.timing.fog_to_message_ms,
                message_to_home_ms: t.timing.message_to_home_ms,
                audio_start_delay_ms: t.timing.audio_start_delay_ms,
                toast_ms: t.timing.toast_ms,
                credits_fog_ms: t.timing.credits_fog_ms,
                credits_text_ms: t.timing.credits_text_ms,
            },
            audio: AudioConfig {
                enabled: t.audio.enabled,
                autoplay: t.audio.autoplay,
                volume: t.audio.volume,
            },
            client: ClientConfig {
                min_cols: t.client.min_cols,
                min_rows: t.client.min_rows,
            },
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
                mute: t.gamepad.mute,
            },
            maze_file: t.general.maze_file.map(PathBuf::from),
            log_file: PathBuf::from(t.general.log_file),
            log_level: t.general.log_level,
            source: None,
            warnings: Vec::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gurufarm");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn search_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> (TomlConfig, Option<PathBuf>) {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            if let Some(cfg) = read_toml(&path, warnings) {
                return (cfg, Some(path));
            }
            // Unparseable file: stop searching, use defaults.
            return (TomlConfig::default(), None);
        }
    }
    (TomlConfig::default(), None)
}

fn read_toml(path: &Path, warnings: &mut Vec<String>) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match parse_toml(&text) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warnings.push(format!("{}: parse error, using defaults: {e}", path.display()));
                None
            }
        },
        Err(e) => {
            warnings.push(format!("could not read {}: {e}", path.display()));
            None
        }
    }
}

fn parse_toml(text: &str) -> Result<TomlConfig, toml::de::Error> {
    toml::from_str::<TomlConfig>(text)
}
