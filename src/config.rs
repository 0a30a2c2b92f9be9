// src/config.rs

//! Configuration for the editor: fresh-canvas size, cursor blink cadence,
//! and the paint/sample/save/load key bindings.
//!
//! Settings are deserialized from `termpaint.json` in the working
//! directory when present. Every field falls back to its default, so a
//! partial file only overrides what it names and a missing file is not an
//! error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use log::{info, warn};

/// Configuration file read from the working directory at startup.
pub const CONFIG_FILE: &str = "termpaint.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Fresh-canvas and save-target settings.
    pub canvas: CanvasConfig,
    /// Cursor appearance settings.
    pub cursor: CursorConfig,
    /// Editing key bindings.
    pub keys: KeyBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Width in pixels of a fresh canvas.
    pub width: usize,
    /// Height in pixels of a fresh canvas.
    pub height: usize,
    /// Where the save key writes the canvas, unless overridden on the
    /// command line.
    pub output: PathBuf,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 20,
            height: 20,
            output: PathBuf::from("out.png"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Milliseconds between blink phase flips.
    pub blink_interval_ms: u64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        CursorConfig {
            blink_interval_ms: 200,
        }
    }
}

/// Single-character bindings for the editing actions. Movement and focus
/// keys (arrows, Tab) are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub paint: char,
    pub sample: char,
    pub save: char,
    pub load: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            paint: 'q',
            sample: 'w',
            save: 's',
            load: 'l',
        }
    }
}

impl Config {
    /// Reads [`CONFIG_FILE`] from the working directory. A missing file is
    /// the normal case and yields defaults silently; an unreadable or
    /// invalid file is logged and also yields defaults.
    pub fn load_or_default() -> Self {
        match std::fs::read_to_string(CONFIG_FILE) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => {
                    info!("Loaded configuration from {}.", CONFIG_FILE);
                    config
                }
                Err(e) => {
                    warn!("Ignoring invalid {}: {}", CONFIG_FILE, e);
                    Config::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                warn!("Could not read {}: {}", CONFIG_FILE, e);
                Config::default()
            }
        }
    }
}
