//! Held-key state written by host key events

use std::collections::HashSet;

use crate::sim::{InputState, Key};

/// Keys currently held down.
///
/// Written from key events and read once per tick through
/// [`KeyboardState::snapshot`]; the tick never sees a key change mid-update.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press by host key name. Returns the recognized key.
    pub fn press(&mut self, name: &str) -> Option<Key> {
        let key = Key::from_name(name)?;
        self.held.insert(key);
        Some(key)
    }

    /// Record a key release by host key name. Returns the recognized key.
    pub fn release(&mut self, name: &str) -> Option<Key> {
        let key = Key::from_name(name)?;
        self.held.remove(&key);
        Some(key)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Drop all held keys (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn snapshot(&self) -> InputState {
        InputState::from_keys(self.held.iter().copied())
    }
}
