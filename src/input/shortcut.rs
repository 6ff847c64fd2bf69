use crate::editor::ToolMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    OpenImage,
    PasteImage,
    CopyImage,
    Undo,
    Reset,
    SelectTool(ToolMode),
    CancelSelection,
}

fn resolve_tool_shortcut(key: ShortcutKey) -> Option<ShortcutAction> {
    match key {
        ShortcutKey::Character('x') => Some(ShortcutAction::SelectTool(ToolMode::Blackout)),
        ShortcutKey::Character('b') => Some(ShortcutAction::SelectTool(ToolMode::Blur)),
        _ => None,
    }
}

pub fn resolve_shortcut(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Character('o'), true, false) => Some(ShortcutAction::OpenImage),
        (ShortcutKey::Character('v'), true, false) => Some(ShortcutAction::PasteImage),
        (ShortcutKey::Character('c'), true, false) => Some(ShortcutAction::CopyImage),
        (ShortcutKey::Character('z'), true, false) => Some(ShortcutAction::Undo),
        (ShortcutKey::Character('r'), true, true) => Some(ShortcutAction::Reset),
        (ShortcutKey::Escape, false, false) => Some(ShortcutAction::CancelSelection),
        (_, false, false) => resolve_tool_shortcut(key),
        _ => None,
    }
}
