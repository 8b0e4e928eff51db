//! Keys and the per-tick input snapshot

use serde::{Deserialize, Serialize};

/// Keys the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `w` - strafe up
    W,
    /// `a` - strafe left
    A,
    /// `s` - strafe down
    S,
    /// `d` - strafe right
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Space - toggles the animation on release
    Pause,
}

impl Key {
    /// Map a host key name (case-insensitive) to a key
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "arrowup" => Some(Key::ArrowUp),
            "arrowdown" => Some(Key::ArrowDown),
            "arrowleft" => Some(Key::ArrowLeft),
            "arrowright" => Some(Key::ArrowRight),
            " " | "space" | "spacebar" => Some(Key::Pause),
            _ => None,
        }
    }

    /// Keys whose default host handling (page scroll etc.) should be suppressed
    pub fn is_movement(&self) -> bool {
        !matches!(self, Key::Pause)
    }
}

/// How two opposing held keys resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpposingKeys {
    /// The first-checked key wins (right over left, forward over back,
    /// up over down, left over right)
    #[default]
    FirstWins,
    /// Both held cancel out
    Cancel,
}

impl OpposingKeys {
    /// Signed axis value: +1 for `primary`, -1 for `secondary`
    pub fn resolve(self, primary: bool, secondary: bool) -> f64 {
        match self {
            OpposingKeys::FirstWins => {
                if primary {
                    1.0
                } else if secondary {
                    -1.0
                } else {
                    0.0
                }
            }
            OpposingKeys::Cancel => (primary as i8 - secondary as i8) as f64,
        }
    }
}

/// Held-key snapshot taken once at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Build a snapshot from an iterator of held keys
    pub fn from_keys<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        let mut input = Self::default();
        for key in keys {
            match key {
                Key::W => input.up = true,
                Key::S => input.down = true,
                Key::A => input.left = true,
                Key::D => input.right = true,
                Key::ArrowUp => input.forward = true,
                Key::ArrowDown => input.backward = true,
                Key::ArrowLeft => input.turn_left = true,
                Key::ArrowRight => input.turn_right = true,
                Key::Pause => {}
            }
        }
        input
    }

    /// True when forward or backward is held (tank drive replaces strafing)
    pub fn drives(&self) -> bool {
        self.forward || self.backward
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
