/// Logical commands, decoded from keyboard and gamepad input.
/// Screens receive these one at a time, in arrival order.

use crate::domain::entity::Direction;
use super::home::Section;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    ToggleMute,
    Confirm,
    ShowAddress,
    CopyAddress,
    OpenCredits,
    /// Header link on the home page.
    JumpTo(Section),
    Back,
    Quit,
}
