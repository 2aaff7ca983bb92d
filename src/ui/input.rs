/// Keyboard input.
///
/// Every key press becomes at most one `Command`, queued in the order the
/// terminal delivered it. Moves are discrete (one cell per press or
/// auto-repeat), so no held-key tracking is needed.
///
/// Release events are dropped; terminals with keyboard enhancement report
/// them and they would otherwise double every move.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::domain::entity::Direction;
use crate::sim::command::Command;
use crate::sim::home::Section;

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_MUTE: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_COPY: &[KeyCode] = &[KeyCode::Char('c'), KeyCode::Char('C')];
const KEYS_ADDRESS: &[KeyCode] = &[KeyCode::Char('x'), KeyCode::Char('X')];
const KEYS_CREDITS: &[KeyCode] = &[KeyCode::Char('b'), KeyCode::Char('B')];
/// Header links, in header order.
const KEYS_SECTIONS: [(KeyCode, Section); 3] = [
    (KeyCode::Char('1'), Section::HowToBuy),
    (KeyCode::Char('2'), Section::Roadmap),
    (KeyCode::Char('3'), Section::Chart),
];

pub struct InputState {
    queue: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { queue: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame; commands come back in arrival order.
    pub fn drain_events(&mut self) -> Vec<Command> {
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(cmd) = decode(key) {
                        self.queue.push(cmd);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "terminal read failed");
                    break;
                }
            }
        }
        std::mem::take(&mut self.queue)
    }
}

/// Map one key event to a command.
pub fn decode(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && KEYS_COPY.contains(&key.code) {
        return Some(Command::Quit);
    }

    let code = key.code;
    let cmd = if KEYS_UP.contains(&code) {
        Command::Move(Direction::Up)
    } else if KEYS_DOWN.contains(&code) {
        Command::Move(Direction::Down)
    } else if KEYS_LEFT.contains(&code) {
        Command::Move(Direction::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Command::Move(Direction::Right)
    } else if KEYS_CONFIRM.contains(&code) {
        Command::Confirm
    } else if code == KeyCode::Esc {
        Command::Back
    } else if KEYS_MUTE.contains(&code) {
        Command::ToggleMute
    } else if KEYS_QUIT.contains(&code) {
        Command::Quit
    } else if KEYS_COPY.contains(&code) {
        Command::CopyAddress
    } else if KEYS_ADDRESS.contains(&code) {
        Command::ShowAddress
    } else if KEYS_CREDITS.contains(&code) {
        Command::OpenCredits
    } else if let Some((_, section)) = KEYS_SECTIONS.iter().find(|(k, _)| *k == code) {
        Command::JumpTo(*section)
    } else {
        return None;
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_move() {
        assert_eq!(decode(press(KeyCode::Up)), Some(Command::Move(Direction::Up)));
        assert_eq!(decode(press(KeyCode::Char('a'))), Some(Command::Move(Direction::Left)));
        assert_eq!(decode(press(KeyCode::Char('S'))), Some(Command::Move(Direction::Down)));
        assert_eq!(decode(press(KeyCode::Right)), Some(Command::Move(Direction::Right)));
    }

    #[test]
    fn release_is_ignored() {
        let key = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(decode(key), None);
    }

    #[test]
    fn ctrl_c_quits_plain_c_copies() {
        assert_eq!(
            decode(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(decode(press(KeyCode::Char('c'))), Some(Command::CopyAddress));
    }

    #[test]
    fn screen_keys() {
        assert_eq!(decode(press(KeyCode::Enter)), Some(Command::Confirm));
        assert_eq!(decode(press(KeyCode::Esc)), Some(Command::Back));
        assert_eq!(decode(press(KeyCode::Char('m'))), Some(Command::ToggleMute));
        assert_eq!(decode(press(KeyCode::Char('b'))), Some(Command::OpenCredits));
        assert_eq!(decode(press(KeyCode::Char('x'))), Some(Command::ShowAddress));
        assert_eq!(decode(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(decode(press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn digits_jump_to_sections() {
        assert_eq!(decode(press(KeyCode::Char('1'))), Some(Command::JumpTo(Section::HowToBuy)));
        assert_eq!(decode(press(KeyCode::Char('2'))), Some(Command::JumpTo(Section::Roadmap)));
        assert_eq!(decode(press(KeyCode::Char('3'))), Some(Command::JumpTo(Section::Chart)));
        assert_eq!(decode(press(KeyCode::Char('4'))), None);
    }
}
