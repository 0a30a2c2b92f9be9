// src/backend/mock.rs

use crate::backend::{BackendEvent, Driver};
use crate::color::Rgb;
use crate::render::Cell;
use anyhow::Result;
use std::os::unix::io::RawFd;

/// Test double for [`Driver`]: events go in through `push_event`, draw
/// calls are recorded for assertions.
pub struct MockDriver {
    events: Vec<BackendEvent>,
    drawn_text: Vec<(u16, u16, String, Rgb, Rgb)>,
    drawn_cells: Vec<(u16, u16, Vec<Cell>)>,
    titles: Vec<String>,
    clear_count: usize,
    present_count: usize,
    cleanup_count: usize,
    dims: (u16, u16),
}

impl MockDriver {
    pub fn new() -> Self {
        Self::with_dims(80, 24)
    }

    pub fn with_dims(cols: u16, rows: u16) -> Self {
        Self {
            events: Vec::new(),
            drawn_text: Vec::new(),
            drawn_cells: Vec::new(),
            titles: Vec::new(),
            clear_count: 0,
            present_count: 0,
            cleanup_count: 0,
            dims: (cols, rows),
        }
    }

    pub fn push_event(&mut self, event: BackendEvent) {
        self.events.push(event);
    }

    /// Recorded `draw_text` calls as (x, y, text, fg, bg).
    pub fn drawn_text(&self) -> &[(u16, u16, String, Rgb, Rgb)] {
        &self.drawn_text
    }

    /// Recorded `draw_cells` calls as (x, y, cells).
    pub fn drawn_cells(&self) -> &[(u16, u16, Vec<Cell>)] {
        &self.drawn_cells
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn clear_count(&self) -> usize {
        self.clear_count
    }

    pub fn present_count(&self) -> usize {
        self.present_count
    }

    pub fn cleanup_count(&self) -> usize {
        self.cleanup_count
    }
}

impl Driver for MockDriver {
    fn new() -> Result<Self> {
        Ok(Self::new())
    }

    fn get_event_fd(&self) -> Option<RawFd> {
        None
    }

    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        Ok(self.events.drain(..).collect())
    }

    fn dimensions(&self) -> (u16, u16) {
        self.dims
    }

    fn clear(&mut self) -> Result<()> {
        self.clear_count += 1;
        Ok(())
    }

    fn draw_cells(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        self.drawn_cells.push((x, y, cells.to_vec()));
        Ok(())
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgb, bg: Rgb) -> Result<()> {
        self.drawn_text.push((x, y, text.to_string(), fg, bg));
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.present_count += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_string());
    }

    fn cleanup(&mut self) -> Result<()> {
        self.cleanup_count += 1;
        Ok(())
    }
}
