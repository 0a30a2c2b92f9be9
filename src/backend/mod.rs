// src/backend/mod.rs

//! Defines the `Driver` trait for terminal backends and the generic
//! `BackendEvent`s they translate raw input into. The editor core and the
//! renderer only ever speak to this interface, which keeps them testable
//! against the mock driver.

use crate::color::Rgb;
use crate::render::Cell;
pub use crate::keys::{KeySymbol, Modifiers};

use anyhow::Result;
use std::os::unix::io::RawFd;

pub mod console;
#[cfg(test)]
pub mod mock;

/// Fallback terminal width in cells when the real size cannot be queried.
pub const DEFAULT_WIDTH_CELLS: u16 = 80;
/// Fallback terminal height in cells when the real size cannot be queried.
pub const DEFAULT_HEIGHT_CELLS: u16 = 24;

/// Events originating from the backend, already translated out of their
/// platform encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// A keyboard key was pressed.
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
    },
    /// The terminal gained input focus.
    FocusGained,
    /// The terminal lost input focus.
    FocusLost,
    /// The platform asked the application to exit, e.g. stdin reached EOF.
    CloseRequested,
}

/// Interface between the editor and one concrete terminal backend.
///
/// A driver owns the terminal: it configures raw input on creation,
/// translates bytes into [`BackendEvent`]s, exposes drawing primitives for
/// the renderer, and restores the terminal in `cleanup`.
pub trait Driver {
    /// Creates and initializes the driver, taking over the terminal.
    fn new() -> Result<Self>
    where
        Self: Sized;

    /// A file descriptor the event loop can monitor for input readiness,
    /// or `None` if the driver must be polled.
    fn get_event_fd(&self) -> Option<RawFd>;

    /// Drains pending platform input into generic events. Returns an empty
    /// vector when nothing (or only unrecognized input) arrived.
    fn process_events(&mut self) -> Result<Vec<BackendEvent>>;

    /// Current terminal size in character cells.
    fn dimensions(&self) -> (u16, u16);

    /// Clears the whole display to the default background.
    fn clear(&mut self) -> Result<()>;

    /// Draws a run of pre-colored cells starting at cell (x, y), 0-based.
    fn draw_cells(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()>;

    /// Draws a single-style run of text starting at cell (x, y), 0-based.
    fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgb, bg: Rgb) -> Result<()>;

    /// Makes everything drawn since the last call visible.
    fn present(&mut self) -> Result<()>;

    /// Sets the terminal or window title.
    fn set_title(&mut self, title: &str);

    /// Restores the terminal to its pre-driver state. Must be idempotent;
    /// it runs both on orderly shutdown and from `Drop`.
    fn cleanup(&mut self) -> Result<()>;
}
