use super::tools::ToolMode;

/// The single user-facing message line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Control enablement and visibility, derived entirely from session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub undo_enabled: bool,
    pub reset_enabled: bool,
    pub copy_enabled: bool,
    pub blur_radius_visible: bool,
    pub placeholder_visible: bool,
}

impl ControlState {
    pub const fn derive(has_image: bool, history_len: usize, mode: ToolMode) -> Self {
        Self {
            undo_enabled: history_len > 0,
            reset_enabled: has_image,
            copy_enabled: has_image,
            blur_radius_visible: mode.shows_blur_radius(),
            placeholder_visible: !has_image,
        }
    }
}
