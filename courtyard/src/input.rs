use std::collections::HashSet;

use winit::{event::ElementState, event::KeyEvent, keyboard::KeyCode};

use crate::math::Vec2;

/// Tracks keyboard and cursor state across frames.
pub struct InputState {
    keys_down: HashSet<KeyCode>,

    mouse_x: f32,
    mouse_y: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            mouse_x: 0.0,
            mouse_y: 0.0,
        }
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let winit::keyboard::PhysicalKey::Code(keycode) = event.physical_key {
            self.set_key(keycode, event.state);
        }
    }

    fn set_key(&mut self, keycode: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_down.insert(keycode);
            }
            ElementState::Released => {
                self.keys_down.remove(&keycode);
            }
        }
    }

    /// Handle mouse cursor movement from winit.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.mouse_x = x as f32;
        self.mouse_y = y as f32;
    }

    /// Returns true if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Cursor position in [-1,1]² with y pointing up, sampled at pixel centers.
    pub fn pointer_ndc(&self, width: u32, height: u32) -> Vec2 {
        Vec2::new(
            (self.mouse_x + 0.5) / width.max(1) as f32 * 2.0 - 1.0,
            (self.mouse_y + 0.5) / height.max(1) as f32 * -2.0 + 1.0,
        )
    }

    /// Snapshot of which logical actions are held right now.
    pub fn actions(&self) -> ActionSet {
        Action::ALL
            .into_iter()
            .filter(|action| self.is_key_down(action.key()))
            .fold(ActionSet::default(), |set, action| set.with(action))
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed set of things the player can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Interact,
    Quit,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Interact,
        Action::Quit,
    ];

    /// Physical key bound to the action.
    pub const fn key(self) -> KeyCode {
        match self {
            Action::Left => KeyCode::KeyA,
            Action::Right => KeyCode::KeyD,
            Action::Up => KeyCode::KeyW,
            Action::Down => KeyCode::KeyS,
            Action::Interact => KeyCode::KeyC,
            Action::Quit => KeyCode::Escape,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Held/not-held state of every [`Action`] for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionSet(u8);

impl ActionSet {
    pub fn with(self, action: Action) -> Self {
        Self(self.0 | action.bit())
    }

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::with)
    }
}

/// Input handed to the simulation: this frame's and last frame's actions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub current: ActionSet,
    pub previous: ActionSet,
    /// Cursor in normalized device coordinates; captured but unused by the game.
    pub pointer: Vec2,
}

impl FrameInput {
    pub fn new(current: ActionSet, previous: ActionSet) -> Self {
        Self {
            current,
            previous,
            pointer: Vec2::ZERO,
        }
    }

    /// Input with `held` down this frame and nothing down last frame.
    pub fn fresh(held: &[Action]) -> Self {
        Self::new(held.iter().copied().collect(), ActionSet::default())
    }

    pub fn held(&self, action: Action) -> bool {
        self.current.contains(action)
    }

    /// True only on the frame the action goes from released to held.
    pub fn pressed(&self, action: Action) -> bool {
        self.current.contains(action) && !self.previous.contains(action)
    }
}
