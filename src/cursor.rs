// src/cursor.rs

//! Cursor position and blink state for one grid.
//!
//! Every grid widget owns its own cursor. Movement clamps to the grid edges
//! instead of wrapping, and the blink phase only advances while the cursor's
//! widget is focused, so the marker freezes (and is not drawn) everywhere
//! else.

/// Default spawn column, clamped into range on construction.
const DEFAULT_OFFSET_X: usize = 2;
/// Default spawn row, clamped into range on construction.
const DEFAULT_OFFSET_Y: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    blink_phase: bool,
    focused: bool,
}

impl Cursor {
    /// Creates a cursor for a `dx` by `dy` grid, near the top-left corner.
    /// Tiny grids pull the spawn point in so it always lands on a pixel.
    pub fn new(dx: usize, dy: usize) -> Self {
        Cursor {
            x: DEFAULT_OFFSET_X.min(dx.saturating_sub(1)),
            y: DEFAULT_OFFSET_Y.min(dy.saturating_sub(1)),
            blink_phase: false,
            focused: false,
        }
    }

    /// True while the marker should be visible this blink phase.
    pub fn blink_phase(&self) -> bool {
        self.blink_phase
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn move_left(&mut self) {
        self.x = self.x.saturating_sub(1);
    }

    pub fn move_right(&mut self, dx: usize) {
        self.x = (self.x + 1).min(dx.saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        self.y = self.y.saturating_sub(1);
    }

    pub fn move_down(&mut self, dy: usize) {
        self.y = (self.y + 1).min(dy.saturating_sub(1));
    }

    /// Pulls the cursor back inside a `dx` by `dy` grid after the grid
    /// shrinks underneath it, e.g. when a smaller image is loaded.
    pub fn clamp_to(&mut self, dx: usize, dy: usize) {
        self.x = self.x.min(dx.saturating_sub(1));
        self.y = self.y.min(dy.saturating_sub(1));
    }

    /// The widget gained focus. The phase restarts hidden so the first
    /// blink tick shows the marker at a predictable time.
    pub fn focus_gained(&mut self) {
        self.focused = true;
        self.blink_phase = false;
    }

    /// The widget lost focus. Also resets the phase, so regaining focus
    /// never starts mid-blink.
    pub fn focus_lost(&mut self) {
        self.focused = false;
        self.blink_phase = false;
    }

    /// One blink interval elapsed. Ignored while unfocused; a paused cursor
    /// drops ticks rather than queueing them.
    pub fn tick(&mut self) {
        if self.focused {
            self.blink_phase = !self.blink_phase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_inside_small_grids() {
        let roomy = Cursor::new(8, 8);
        assert_eq!((roomy.x, roomy.y), (2, 1));

        let narrow = Cursor::new(2, 1);
        assert_eq!((narrow.x, narrow.y), (1, 0));

        let single = Cursor::new(1, 1);
        assert_eq!((single.x, single.y), (0, 0));
    }

    #[test]
    fn movement_clamps_at_every_edge() {
        let mut cursor = Cursor::new(3, 3);
        for _ in 0..10 {
            cursor.move_left();
            cursor.move_up();
        }
        assert_eq!((cursor.x, cursor.y), (0, 0));

        for _ in 0..10 {
            cursor.move_right(3);
            cursor.move_down(3);
        }
        assert_eq!((cursor.x, cursor.y), (2, 2));

        // A second push against the edge stays put.
        cursor.move_right(3);
        assert_eq!(cursor.x, 2);
    }

    #[test]
    fn one_by_one_grid_pins_the_cursor() {
        let mut cursor = Cursor::new(1, 1);
        cursor.move_left();
        cursor.move_right(1);
        cursor.move_up();
        cursor.move_down(1);
        assert_eq!((cursor.x, cursor.y), (0, 0));
    }

    #[test]
    fn clamp_after_shrink() {
        let mut cursor = Cursor::new(10, 10);
        cursor.x = 9;
        cursor.y = 7;
        cursor.clamp_to(4, 2);
        assert_eq!((cursor.x, cursor.y), (3, 1));
    }

    #[test]
    fn ticks_only_advance_while_focused() {
        let mut cursor = Cursor::new(4, 4);
        cursor.tick();
        assert!(!cursor.blink_phase(), "unfocused cursor must not blink");

        cursor.focus_gained();
        cursor.tick();
        assert!(cursor.blink_phase());
        cursor.tick();
        assert!(!cursor.blink_phase());
        cursor.tick();
        assert!(cursor.blink_phase());
    }

    #[test]
    fn focus_changes_reset_the_phase() {
        let mut cursor = Cursor::new(4, 4);
        cursor.focus_gained();
        cursor.tick();
        assert!(cursor.blink_phase());

        cursor.focus_lost();
        assert!(!cursor.blink_phase());

        // Ticks while unfocused are dropped, not queued.
        cursor.tick();
        cursor.tick();
        cursor.tick();
        assert!(!cursor.blink_phase());

        cursor.focus_gained();
        assert!(!cursor.blink_phase(), "regained focus restarts hidden");
    }
}
