/// Gamepad input using gilrs.
///
/// Button mapping comes from the `[gamepad]` section of config.toml.
/// Default mapping:
///   D-pad / Left Stick    →  Move (one cell per press)
///   Start / A             →  Confirm
///   Select / B            →  Back
///   Y                     →  Mute toggle
///
/// Like the keyboard, each press yields one `Command` in arrival order.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::Direction;
use crate::sim::command::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    mute: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::Start, Btn::A],
            cancel:  vec![Btn::Select, Btn::B],
            mute:    vec![Btn::Y],
        }
    }
}

impl ActionMap {
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let mut map = ActionMap::default();
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { map.confirm = cf; }
        let ca = parse_list(&cfg.cancel);
        if !ca.is_empty() { map.cancel = ca; }
        let mu = parse_list(&cfg.mute);
        if !mu.is_empty() { map.mute = mu; }
        map
    }

    /// Confirm wins over cancel wins over mute when lists overlap.
    fn command_for(&self, btn: Btn) -> Option<Command> {
        if self.confirm.contains(&btn) {
            Some(Command::Confirm)
        } else if self.cancel.contains(&btn) {
            Some(Command::Back)
        } else if self.mute.contains(&btn) {
            Some(Command::ToggleMute)
        } else {
            None
        }
    }
}

/// Which way the stick currently points, if past the deadzone.
fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        None
    } else if x.abs() >= y.abs() {
        Some(if x < 0.0 { Direction::Left } else { Direction::Right })
    } else {
        Some(if y > 0.0 { Direction::Up } else { Direction::Down })
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    stick_x: f32,
    stick_y: f32,
    /// Direction the stick last fired; re-arms when it returns to centre.
    stick_dir: Option<Direction>,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    tracing::info!(error = %e, "gamepad support unavailable");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            action_map: ActionMap::from_config(cfg),
            connected,
        }
    }

    /// Drain pending gamepad events into commands, in arrival order.
    pub fn drain(&mut self) -> Vec<Command> {
        #[cfg(feature = "gamepad")]
        {
            self.poll_gilrs()
        }
        #[cfg(not(feature = "gamepad"))]
        {
            Vec::new()
        }
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) -> Vec<Command> {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return Vec::new(),
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();
        let mut out = Vec::new();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    if let Some(cmd) = self.button_command(btn) {
                        out.push(cmd);
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => continue,
                    }
                    if let Some(cmd) = self.stick_command() {
                        out.push(cmd);
                    }
                }
                EventType::Connected => {
                    self.connected = true;
                    tracing::info!(id = ?event.id, "gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_dir = None;
                    tracing::info!(id = ?event.id, "gamepad disconnected");
                }
                _ => {}
            }
        }
        out
    }

    #[cfg(feature = "gamepad")]
    fn button_command(&self, btn: Button) -> Option<Command> {
        match btn {
            Button::DPadUp    => Some(Command::Move(Direction::Up)),
            Button::DPadDown  => Some(Command::Move(Direction::Down)),
            Button::DPadLeft  => Some(Command::Move(Direction::Left)),
            Button::DPadRight => Some(Command::Move(Direction::Right)),
            other => Btn::from_gilrs(other).and_then(|b| self.action_map.command_for(b)),
        }
    }

    /// Edge-triggered stick move: fires once per push away from centre.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn stick_command(&mut self) -> Option<Command> {
        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir == self.stick_dir {
            return None;
        }
        self.stick_dir = dir;
        dir.map(Command::Move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(confirm: &[&str], cancel: &[&str], mute: &[&str]) -> GamepadConfig {
        let v = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        GamepadConfig { confirm: v(confirm), cancel: v(cancel), mute: v(mute) }
    }

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("South"), Some(Btn::A));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_overrides_defaults() {
        let map = ActionMap::from_config(&cfg(&["X"], &[], &["L1"]));
        assert_eq!(map.command_for(Btn::X), Some(Command::Confirm));
        assert_eq!(map.command_for(Btn::Start), None);
        // Empty list keeps the default.
        assert_eq!(map.command_for(Btn::B), Some(Command::Back));
        assert_eq!(map.command_for(Btn::L1), Some(Command::ToggleMute));
        assert_eq!(map.command_for(Btn::Y), None);
    }

    #[test]
    fn unknown_names_fall_back_to_defaults() {
        let map = ActionMap::from_config(&cfg(&["bogus"], &["bogus"], &["bogus"]));
        assert_eq!(map.command_for(Btn::Start), Some(Command::Confirm));
        assert_eq!(map.command_for(Btn::Y), Some(Command::ToggleMute));
    }

    #[test]
    fn stick_direction_uses_dominant_axis() {
        assert_eq!(stick_direction(0.1, 0.2), None);
        assert_eq!(stick_direction(-0.9, 0.3), Some(Direction::Left));
        assert_eq!(stick_direction(0.2, 0.8), Some(Direction::Up));
        assert_eq!(stick_direction(0.0, -0.7), Some(Direction::Down));
    }

    #[test]
    fn stick_fires_once_per_push() {
        let mut gp = GamepadState::new(&cfg(&[], &[], &[]));
        gp.stick_x = 0.9;
        assert_eq!(gp.stick_command(), Some(Command::Move(Direction::Right)));
        gp.stick_x = 0.95;
        assert_eq!(gp.stick_command(), None);
        gp.stick_x = 0.0;
        assert_eq!(gp.stick_command(), None);
        gp.stick_x = 0.9;
        assert_eq!(gp.stick_command(), Some(Command::Move(Direction::Right)));
    }
}
