use support::Vec2;

/// Per-button press/release/hold/click-count state, ticked once per frame.
#[derive(Debug, Copy, Clone, Default)]
pub struct ButtonState {
    pub down: bool,
    pub up: bool,
    pub held: bool,
    pub click_count: u32,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct MouseState {
    pub position: Vec2,
    pub focused: bool,
    pub wheel: Vec2,
    pub primary: ButtonState,
    pub secondary: ButtonState,
    pub middle: ButtonState,
    pub scrolled: bool,
    pub any_down: bool,
    pub any_up: bool,
    pub any_moved: bool,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct KeyState {
    pub down: bool,
    pub held: bool,
    pub up: bool,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A key the keyboard state machine distinguishes by name rather than by
/// raw scancode, matching the small alphabet the focus/text machinery
/// actually inspects (`Tab`, `Escape`, and arbitrary "other" edges).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Escape,
    Other(u32),
}

#[derive(Debug, Default)]
pub struct KeyboardState {
    pub keys: std::collections::HashMap<Key, KeyState>,
    pub any_down: bool,
    pub any_up: bool,
    pub text: Vec<u32>,
    pub modifiers: Modifiers,
}

impl KeyboardState {
    pub fn key(&self, key: Key) -> KeyState {
        self.keys.get(&key).copied().unwrap_or_default()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DropPhase {
    #[default]
    None,
    Begin,
    Over,
    End,
}

#[derive(Debug, Default)]
pub struct DropState {
    pub phase: DropPhase,
    pub drop_type: String,
    pub bytes: Vec<u8>,
}

/// The full input snapshot consumed once per frame (spec.md §6).
#[derive(Debug, Default)]
pub struct InputState {
    pub window_extent: Vec2,
    pub timestamp: u64,
    pub mouse: MouseState,
    pub keyboard: KeyboardState,
    pub drop: DropState,
    pub closing: bool,
}
