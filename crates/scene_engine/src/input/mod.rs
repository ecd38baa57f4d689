//! Keyboard and mouse input
//!
//! Window backends translate their native events into [`KeyCode`] and
//! cursor positions. The handlers turn those into camera commands; they hold
//! no reference to the camera themselves.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::Direction;

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// W
    W,
    /// A
    A,
    /// S
    S,
    /// D
    D,
    /// Q
    Q,
    /// E
    E,
    /// Space bar
    Space,
    /// Left shift
    LeftShift,
    /// Left control
    LeftControl,
    /// Arrow up
    ArrowUp,
    /// Arrow down
    ArrowDown,
    /// Arrow left
    ArrowLeft,
    /// Arrow right
    ArrowRight,
    /// Escape
    Escape,
}

/// Key state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    /// Key went down
    Press,
    /// Key went up
    Release,
    /// Key held down long enough to auto-repeat
    Repeat,
}

/// Binding of a key to a camera movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Bound key
    pub key: KeyCode,
    /// Direction held while the key is down
    pub direction: Direction,
}

impl KeyBinding {
    /// Create a binding
    pub const fn new(key: KeyCode, direction: Direction) -> Self {
        Self { key, direction }
    }

    /// WASD plus shift and control for vertical motion
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(KeyCode::W, Direction::Forward),
            Self::new(KeyCode::A, Direction::Left),
            Self::new(KeyCode::S, Direction::Backward),
            Self::new(KeyCode::D, Direction::Right),
            Self::new(KeyCode::LeftShift, Direction::Up),
            Self::new(KeyCode::LeftControl, Direction::Down),
        ]
    }
}

/// What a key event asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Turn a movement direction on or off
    SetDirection(Direction, bool),
    /// Close the viewer
    Close,
}

/// Maps key events to camera commands
#[derive(Debug, Clone, Default)]
pub struct KeyboardHandler {
    bindings: HashMap<KeyCode, Direction>,
}

impl KeyboardHandler {
    /// Create a handler from bindings; a later binding of the same key wins
    pub fn new(bindings: &[KeyBinding]) -> Self {
        let mut map = HashMap::with_capacity(bindings.len());
        for binding in bindings {
            if let Some(previous) = map.insert(binding.key, binding.direction) {
                log::debug!("{:?} rebound from {:?} to {:?}", binding.key, previous, binding.direction);
            }
        }
        Self { bindings: map }
    }

    /// Direction bound to `key`
    pub fn binding(&self, key: KeyCode) -> Option<Direction> {
        self.bindings.get(&key).copied()
    }

    /// Translate a key event
    ///
    /// Escape always closes the viewer. Repeats carry no new information
    /// and unbound keys are ignored.
    pub fn process_key(&self, key: KeyCode, action: KeyAction) -> Option<KeyCommand> {
        if key == KeyCode::Escape {
            return (action == KeyAction::Press).then_some(KeyCommand::Close);
        }
        let direction = self.binding(key)?;
        match action {
            KeyAction::Press => Some(KeyCommand::SetDirection(direction, true)),
            KeyAction::Release => Some(KeyCommand::SetDirection(direction, false)),
            KeyAction::Repeat => None,
        }
    }
}

/// Turns absolute cursor positions into swipe deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseHandler {
    last: Option<(f64, f64)>,
}

impl MouseHandler {
    /// Create a handler with no cursor history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cursor position and return the displacement since the
    /// previous one; the first position only primes the handler
    pub fn process_cursor(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let delta = self.last.map(|(last_x, last_y)| ((x - last_x) as f32, (y - last_y) as f32));
        self.last = Some((x, y));
        delta
    }

    /// Forget the last position, e.g. after the window lost focus
    pub fn reset(&mut self) {
        self.last = None;
    }
}
