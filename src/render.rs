// src/render.rs

//! Maps pixel grids onto terminal cells and lays out the full frame.
//!
//! The lower-half-block glyph packs two pixel rows into one text row: the
//! cell background shows the even pixel row and the glyph (foreground)
//! shows the odd row beneath it. `render_row` and `render_grid` are pure
//! so the mapping and cursor overlay are testable without a terminal;
//! `Renderer::draw` arranges the title, both widgets, and the status line
//! through a [`Driver`].

use crate::backend::Driver;
use crate::color::Rgb;
use crate::cursor::Cursor;
use crate::grid::PixelGrid;

use anyhow::Result;

/// Lower half block. Foreground paints the bottom pixel, background the top.
pub const HALF_BLOCK: char = '\u{2584}';

/// Frame chrome colors.
const SCREEN_BG: Rgb = Rgb::BLACK;
const TITLE_FG: Rgb = Rgb::WHITE;
const STATUS_FG: Rgb = Rgb::WHITE;
const FOCUSED_BORDER: Rgb = Rgb::new(255, 0, 0);
const UNFOCUSED_BORDER: Rgb = Rgb::WHITE;

/// Widget boxes start this many text rows from the top, under the title.
const WIDGET_TOP_MARGIN: usize = 2;
/// Blank text rows between the palette box and the canvas box.
const WIDGET_GAP: usize = 1;

/// One terminal cell ready for a driver: a glyph and its two colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

/// Renders text row `row` of a grid: background from pixel row `2 * row`,
/// foreground from `2 * row + 1`. When the cursor is focused, in its
/// visible blink phase, and inside this text row, the half it occupies is
/// replaced by the contrast marker for the pixel underneath.
pub fn render_row(grid: &dyn PixelGrid, cursor: &Cursor, row: usize) -> Vec<Cell> {
    let buffer = grid.buffer();
    let marker_here = cursor.is_focused() && cursor.blink_phase() && cursor.y / 2 == row;
    (0..buffer.dx())
        .map(|x| {
            let mut bg = buffer.get(x, 2 * row);
            let mut fg = buffer.get(x, 2 * row + 1);
            if marker_here && cursor.x == x {
                if cursor.y % 2 == 1 {
                    fg = fg.cursor_marker();
                } else {
                    bg = bg.cursor_marker();
                }
            }
            Cell {
                glyph: HALF_BLOCK,
                fg,
                bg,
            }
        })
        .collect()
}

/// Renders every visible text row of a grid. A trailing odd pixel row has
/// no text row to live in and is not shown.
pub fn render_grid(grid: &dyn PixelGrid, cursor: &Cursor) -> Vec<Vec<Cell>> {
    (0..grid.buffer().visible_rows())
        .map(|row| render_row(grid, cursor, row))
        .collect()
}

/// One grid plus the cursor that walks it, borrowed for a single frame.
pub struct WidgetView<'a> {
    pub grid: &'a dyn PixelGrid,
    pub cursor: &'a Cursor,
}

/// Everything one frame needs, borrowed from the editor state.
pub struct FrameView<'a> {
    pub title: &'a str,
    pub palette: WidgetView<'a>,
    pub canvas: WidgetView<'a>,
    pub active_color: Rgb,
    pub hints: &'a str,
    pub message: &'a str,
}

/// Stateless frame painter. Owns the layout, not the content.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Renderer
    }

    /// Draws a complete frame: clear, title, palette box, canvas box,
    /// status line, present. Content that falls outside the terminal is
    /// clipped rather than wrapped.
    pub fn draw(&self, frame: &FrameView, driver: &mut dyn Driver) -> Result<()> {
        let (cols, rows) = driver.dimensions();
        let cols = cols as usize;
        let rows = rows as usize;

        driver.clear()?;
        draw_centered(driver, 0, cols, rows, frame.title, TITLE_FG)?;

        let mut y = WIDGET_TOP_MARGIN;
        y = draw_widget(driver, y, cols, rows, &frame.palette)?;
        y += WIDGET_GAP;
        draw_widget(driver, y, cols, rows, &frame.canvas)?;

        if rows > 0 {
            draw_status(driver, rows - 1, cols, frame)?;
        }
        driver.present()
    }
}

fn draw_centered(
    driver: &mut dyn Driver,
    y: usize,
    cols: usize,
    rows: usize,
    text: &str,
    fg: Rgb,
) -> Result<()> {
    if y >= rows {
        return Ok(());
    }
    let width = text.chars().count().min(cols);
    let x = (cols - width) / 2;
    let clipped: String = text.chars().take(width).collect();
    driver.draw_text(x as u16, y as u16, &clipped, fg, SCREEN_BG)
}

/// Draws one widget box centered horizontally: heavy border around the
/// rendered grid rows, border colored by focus. Returns the first free text
/// row below the box.
fn draw_widget(
    driver: &mut dyn Driver,
    top: usize,
    cols: usize,
    rows: usize,
    view: &WidgetView,
) -> Result<usize> {
    let dx = view.grid.buffer().dx();
    let border = if view.cursor.is_focused() {
        FOCUSED_BORDER
    } else {
        UNFOCUSED_BORDER
    };
    let x0 = cols.saturating_sub(dx + 2) / 2;
    let body = render_grid(view.grid, view.cursor);

    let mut y = top;
    let horizontal = "━".repeat(dx);
    if y < rows {
        driver.draw_text(x0 as u16, y as u16, &format!("┏{}┓", horizontal), border, SCREEN_BG)?;
    }
    y += 1;
    // The right border column saturates so a grid wider than the u16 cell
    // range stays off screen instead of wrapping back in.
    let right_col = u16::try_from(x0 + 1 + dx).unwrap_or(u16::MAX);
    for cells in &body {
        if y < rows {
            driver.draw_text(x0 as u16, y as u16, "┃", border, SCREEN_BG)?;
            driver.draw_cells(x0 as u16 + 1, y as u16, cells)?;
            driver.draw_text(right_col, y as u16, "┃", border, SCREEN_BG)?;
        }
        y += 1;
    }
    if y < rows {
        driver.draw_text(x0 as u16, y as u16, &format!("┗{}┛", horizontal), border, SCREEN_BG)?;
    }
    Ok(y + 1)
}

/// Status line: a two-cell swatch of the active color, its hex value, the
/// key hints, and the most recent message.
fn draw_status(driver: &mut dyn Driver, y: usize, cols: usize, frame: &FrameView) -> Result<()> {
    let swatch = Cell {
        glyph: ' ',
        fg: frame.active_color,
        bg: frame.active_color,
    };
    driver.draw_cells(0, y as u16, &[swatch, swatch])?;

    let mut line = format!(" {}  {}", frame.active_color, frame.hints);
    if !frame.message.is_empty() {
        line.push_str("  ");
        line.push_str(frame.message);
    }
    let clipped: String = line.chars().take(cols.saturating_sub(2)).collect();
    driver.draw_text(2, y as u16, &clipped, STATUS_FG, SCREEN_BG)
}
