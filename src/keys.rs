// src/keys.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Represents a keyboard modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// Represents a key symbol.
///
/// This covers the keys the editor reacts to plus `Unknown` for everything
/// the input parser cannot map. Characters arrive as typed, so a shifted
/// letter shows up as its uppercase `Char` without a SHIFT modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    Char(char),

    // Navigation keys
    Left,
    Right,
    Up,
    Down,

    // Other common keys
    Enter,
    Backspace,
    Tab,
    Escape,

    // Unidentified key
    #[default]
    Unknown,
}
