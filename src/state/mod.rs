pub mod error;
pub mod event;
pub mod machine;

pub use error::{StateError, StateResult};
pub use event::{GestureOutcome, PointerEvent};
pub use machine::{GestureState, SelectionTracker};
