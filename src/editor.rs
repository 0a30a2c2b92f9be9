// src/editor.rs

//! Editor state and event handling: the palette and canvas widgets, the
//! active color, focus, and the key-to-action mapping.
//!
//! This module never touches the terminal. It consumes `BackendEvent`s and
//! exposes a [`FrameView`] for the renderer, which keeps the whole editing
//! flow testable without a real backend.

use crate::backend::BackendEvent;
use crate::color::Rgb;
use crate::config::{Config, KeyBindings};
use crate::cursor::Cursor;
use crate::grid::{Canvas, Palette, PixelGrid};
use crate::keys::{KeySymbol, Modifiers};
use crate::render::{FrameView, WidgetView};

use log::{debug, info, trace, warn};
use std::path::PathBuf;

pub const APP_TITLE: &str = "termpaint";

/// Status of the application after processing one event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppStatus {
    Running,
    /// The application should terminate gracefully.
    Shutdown,
}

/// Which widget key input is routed to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FocusTarget {
    Palette,
    Canvas,
}

/// What a key press asks the editor to do.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EditorAction {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    Sample,
    Paint,
    Save,
    Load,
    FocusNext,
    FocusPrev,
    Quit,
}

/// Feedback a widget sends back after applying an action.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EditorEvent {
    ColorSampled(Rgb),
}

/// One grid plus the cursor that walks it.
pub struct Widget<G: PixelGrid> {
    pub grid: G,
    pub cursor: Cursor,
}

impl<G: PixelGrid> Widget<G> {
    pub fn new(grid: G) -> Self {
        let (dx, dy) = grid.buffer().dimensions();
        Widget {
            grid,
            cursor: Cursor::new(dx, dy),
        }
    }

    /// Applies a cursor or pixel action. Actions the widget does not handle
    /// (focus, file, quit) are routed elsewhere before this is called.
    fn apply(&mut self, action: EditorAction, active_color: Rgb) -> Option<EditorEvent> {
        let (dx, dy) = self.grid.buffer().dimensions();
        match action {
            EditorAction::CursorLeft => self.cursor.move_left(),
            EditorAction::CursorRight => self.cursor.move_right(dx),
            EditorAction::CursorUp => self.cursor.move_up(),
            EditorAction::CursorDown => self.cursor.move_down(dy),
            EditorAction::Sample => {
                let color = self.grid.sample(self.cursor.x, self.cursor.y);
                return Some(EditorEvent::ColorSampled(color));
            }
            EditorAction::Paint => self.grid.paint(self.cursor.x, self.cursor.y, active_color),
            _ => {}
        }
        None
    }
}

/// The whole editor: both widgets plus everything the status line shows.
pub struct App {
    palette: Widget<Palette>,
    canvas: Widget<Canvas>,
    focus: FocusTarget,
    terminal_focused: bool,
    active_color: Rgb,
    save_path: PathBuf,
    bindings: KeyBindings,
    status: String,
    hints: String,
}

impl App {
    /// Builds the editor around an already-resolved canvas. The palette
    /// starts focused so the first arrow keys pick a color.
    pub fn new(config: &Config, canvas: Canvas, save_path: PathBuf) -> Self {
        let mut palette = Widget::new(Palette::new());
        palette.cursor.focus_gained();
        let canvas = Widget::new(canvas);
        let bindings = config.keys.clone();
        let hints = format!(
            "{} paint  {} sample  {} save  {} load  tab focus  ctrl+c quit",
            bindings.paint, bindings.sample, bindings.save, bindings.load
        );
        info!(
            "Editor ready: canvas {}x{}, saving to {}.",
            canvas.grid.buffer().dx(),
            canvas.grid.buffer().dy(),
            save_path.display()
        );
        App {
            palette,
            canvas,
            focus: FocusTarget::Palette,
            terminal_focused: true,
            active_color: Rgb::BLACK,
            save_path,
            bindings,
            status: String::new(),
            hints,
        }
    }

    pub fn active_color(&self) -> Rgb {
        self.active_color
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Processes one backend event.
    pub fn handle_event(&mut self, event: BackendEvent) -> AppStatus {
        debug!("Handling backend event: {:?}", event);
        match event {
            BackendEvent::Key { symbol, modifiers } => {
                if let Some(action) = self.action_for_key(symbol, modifiers) {
                    trace!("Key maps to {:?}.", action);
                    return self.apply_action(action);
                }
                AppStatus::Running
            }
            BackendEvent::FocusGained => {
                self.set_terminal_focus(true);
                AppStatus::Running
            }
            BackendEvent::FocusLost => {
                self.set_terminal_focus(false);
                AppStatus::Running
            }
            BackendEvent::CloseRequested => {
                info!("Close requested. Shutting down.");
                AppStatus::Shutdown
            }
        }
    }

    /// One blink interval elapsed. Unfocused cursors drop the tick.
    pub fn tick(&mut self) {
        self.palette.cursor.tick();
        self.canvas.cursor.tick();
    }

    /// True while some cursor is focused, i.e. while blink ticks matter.
    pub fn blink_active(&self) -> bool {
        self.palette.cursor.is_focused() || self.canvas.cursor.is_focused()
    }

    /// Borrows everything the renderer needs for one frame.
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            title: APP_TITLE,
            palette: WidgetView {
                grid: &self.palette.grid,
                cursor: &self.palette.cursor,
            },
            canvas: WidgetView {
                grid: &self.canvas.grid,
                cursor: &self.canvas.cursor,
            },
            active_color: self.active_color,
            hints: &self.hints,
            message: &self.status,
        }
    }

    fn action_for_key(&self, symbol: KeySymbol, modifiers: Modifiers) -> Option<EditorAction> {
        if modifiers.contains(Modifiers::CONTROL) {
            return match symbol {
                KeySymbol::Char('c') | KeySymbol::Char('q') => Some(EditorAction::Quit),
                _ => None,
            };
        }
        match symbol {
            KeySymbol::Left => Some(EditorAction::CursorLeft),
            KeySymbol::Right => Some(EditorAction::CursorRight),
            KeySymbol::Up => Some(EditorAction::CursorUp),
            KeySymbol::Down => Some(EditorAction::CursorDown),
            KeySymbol::Tab if modifiers.contains(Modifiers::SHIFT) => Some(EditorAction::FocusPrev),
            KeySymbol::Tab => Some(EditorAction::FocusNext),
            KeySymbol::Char(c) if c == self.bindings.paint => Some(EditorAction::Paint),
            KeySymbol::Char(c) if c == self.bindings.sample => Some(EditorAction::Sample),
            KeySymbol::Char(c) if c == self.bindings.save => Some(EditorAction::Save),
            KeySymbol::Char(c) if c == self.bindings.load => Some(EditorAction::Load),
            _ => None,
        }
    }

    fn apply_action(&mut self, action: EditorAction) -> AppStatus {
        match action {
            EditorAction::Quit => {
                info!("Quit requested.");
                return AppStatus::Shutdown;
            }
            EditorAction::FocusNext | EditorAction::FocusPrev => self.cycle_focus(),
            EditorAction::Save => self.save(),
            EditorAction::Load => self.load(),
            action => {
                let feedback = match self.focus {
                    FocusTarget::Palette => self.palette.apply(action, self.active_color),
                    FocusTarget::Canvas => self.canvas.apply(action, self.active_color),
                };
                if let Some(EditorEvent::ColorSampled(color)) = feedback {
                    debug!("Sampled {} at the cursor.", color);
                    self.active_color = color;
                    self.status = format!("sampled {}", color);
                }
            }
        }
        AppStatus::Running
    }

    /// With only two widgets, focus-next and focus-previous land in the
    /// same place; both just cross to the other widget.
    fn cycle_focus(&mut self) {
        self.focused_cursor_mut().focus_lost();
        self.focus = match self.focus {
            FocusTarget::Palette => FocusTarget::Canvas,
            FocusTarget::Canvas => FocusTarget::Palette,
        };
        if self.terminal_focused {
            self.focused_cursor_mut().focus_gained();
        }
        trace!("Focus moved to {:?}.", self.focus);
    }

    fn set_terminal_focus(&mut self, focused: bool) {
        self.terminal_focused = focused;
        let cursor = self.focused_cursor_mut();
        if focused {
            cursor.focus_gained();
        } else {
            cursor.focus_lost();
        }
    }

    fn focused_cursor_mut(&mut self) -> &mut Cursor {
        match self.focus {
            FocusTarget::Palette => &mut self.palette.cursor,
            FocusTarget::Canvas => &mut self.canvas.cursor,
        }
    }

    /// Writes the focused grid to the save path. Grids that do not save
    /// (the palette) make this a silent no-op.
    fn save(&mut self) {
        let raster = match self.focus {
            FocusTarget::Palette => self.palette.grid.to_raster(),
            FocusTarget::Canvas => self.canvas.grid.to_raster(),
        };
        let Some(encoded) = raster else {
            trace!("Focused widget does not save; ignoring.");
            return;
        };
        match encoded {
            Ok(bytes) => match std::fs::write(&self.save_path, &bytes) {
                Ok(()) => {
                    info!("Saved canvas to {}.", self.save_path.display());
                    self.status = format!("saved {}", self.save_path.display());
                }
                Err(e) => {
                    warn!("Could not write {}: {}", self.save_path.display(), e);
                    self.status = format!("save failed: {}", e);
                }
            },
            Err(e) => {
                warn!("Could not encode canvas: {}", e);
                self.status = format!("save failed: {}", e);
            }
        }
    }

    /// Replaces the focused grid from the save path. Any failure leaves the
    /// grid as it was and only posts a status message.
    fn load(&mut self) {
        let loads = match self.focus {
            FocusTarget::Palette => self.palette.grid.loads_raster(),
            FocusTarget::Canvas => self.canvas.grid.loads_raster(),
        };
        if !loads {
            trace!("Focused widget does not load; ignoring.");
            return;
        }
        let bytes = match std::fs::read(&self.save_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not read {}: {}", self.save_path.display(), e);
                self.status = format!("load failed: {}", e);
                return;
            }
        };
        let outcome = match self.focus {
            FocusTarget::Palette => self.palette.grid.load_raster(&bytes),
            FocusTarget::Canvas => self.canvas.grid.load_raster(&bytes),
        };
        match outcome {
            Ok(None) => trace!("Focused widget ignored the load."),
            Ok(Some((dx, dy))) => {
                self.focused_cursor_mut().clamp_to(dx, dy);
                self.status = format!("loaded {}", self.save_path.display());
            }
            Err(e) => {
                warn!("Could not decode {}: {}", self.save_path.display(), e);
                self.status = format!("load failed: {}", e);
            }
        }
    }
}
