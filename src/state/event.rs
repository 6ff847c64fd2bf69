use crate::geometry::{ImagePoint, SelectionRect};

/// Pointer input already mapped into buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(ImagePoint),
    Move(ImagePoint),
    Up,
    Cancel,
}

impl PointerEvent {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Down(_) => "down",
            Self::Move(_) => "move",
            Self::Up => "up",
            Self::Cancel => "cancel",
        }
    }
}

/// What a single pointer event did to the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The event did not apply to the current gesture state.
    Ignored,
    Started,
    Preview(SelectionRect),
    Commit(SelectionRect),
    /// The gesture ended without a usable rectangle.
    Discarded,
}
