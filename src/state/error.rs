use super::event::PointerEvent;
use super::machine::GestureState;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid gesture transition: from {from:?} using pointer {event:?}")]
    InvalidGestureTransition {
        from: GestureState,
        event: PointerEvent,
    },
}
