/// Events emitted while processing input and timers.
/// The presentation layer consumes these for sound and status text.

use crate::domain::entity::Position;
use super::route::Route;
use super::sequencer::TransitionState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeEvent {
    PositionChanged { from: Position, to: Position },
    Bumped { at: Position },
    Transition(TransitionState),
    Navigated(Route),
    AudioChanged { playing: bool },
}
