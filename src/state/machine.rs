use super::error::{StateError, StateResult};
use super::event::{GestureOutcome, PointerEvent};
use crate::geometry::{ImagePoint, SelectionRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        start: ImagePoint,
        rect: Option<SelectionRect>,
    },
}

/// Turns pointer down/move/up/cancel into at most one committed rectangle per gesture.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    state: GestureState,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    pub fn can_transition(&self, event: PointerEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: PointerEvent) -> Option<GestureState> {
        use PointerEvent::*;
        match (self.state, event) {
            // A second press restarts the gesture from the new point.
            (_, Down(start)) => Some(GestureState::Dragging { start, rect: None }),
            (GestureState::Dragging { start, .. }, Move(point)) => Some(GestureState::Dragging {
                start,
                rect: Some(SelectionRect::from_corners(start, point)),
            }),
            (GestureState::Dragging { .. }, Up | Cancel) => Some(GestureState::Idle),
            (GestureState::Idle, Move(_) | Up | Cancel) => None,
        }
    }

    pub fn transition(&mut self, event: PointerEvent) -> StateResult<GestureOutcome> {
        let next = self.next_state(event).ok_or_else(|| {
            tracing::trace!(from = ?self.state, event = event.name(), "pointer event ignored");
            StateError::InvalidGestureTransition {
                from: self.state,
                event,
            }
        })?;

        let outcome = match (self.state, next) {
            (_, GestureState::Dragging { rect: None, .. }) => GestureOutcome::Started,
            (_, GestureState::Dragging {
                rect: Some(rect), ..
            }) => GestureOutcome::Preview(rect),
            (GestureState::Dragging { rect, .. }, GestureState::Idle) => {
                match rect.filter(SelectionRect::meets_minimum_size) {
                    Some(rect) => GestureOutcome::Commit(rect),
                    None => GestureOutcome::Discarded,
                }
            }
            (GestureState::Idle, GestureState::Idle) => GestureOutcome::Ignored,
        };

        self.state = next;
        Ok(outcome)
    }

    /// Drops any gesture in progress, as when a new image replaces the buffer.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}
