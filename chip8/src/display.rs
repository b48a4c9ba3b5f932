use std::fmt::Display as FmtDisplay;

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub type FrameBuffer = [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT];

pub struct Display {
    /// Monochrome frame buffer indexed as `fb[y][x]`, where each cell is a pixel that is on or off
    pub(crate) fb: FrameBuffer,
    pub(crate) dirty: bool,
}

impl Display {
    pub fn new() -> Self {
        Self {
            fb: [[false; SCREEN_WIDTH]; SCREEN_HEIGHT],
            dirty: false,
        }
    }

    /// Take a snapshot of the frame buffer and mark the display as presented
    pub fn fb(&mut self) -> FrameBuffer {
        self.dirty = false;
        self.fb
    }

    /// Toggle the pixel at the coordinates and return true if it was already on
    /// This function marks the display as dirty, causing it to be re-rendered on the next update
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        self.dirty = true;
        let prev = self.fb[y][x];
        self.fb[y][x] = !prev;
        prev
    }

    /// Clear the display contents by switching every pixel off
    /// This function marks the display as dirty, causing it to be re-rendered on the next update
    pub fn clear(&mut self) {
        self.dirty = true;
        for row in self.fb.iter_mut() {
            row.fill(false);
        }
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH && y < SCREEN_HEIGHT && self.fb[y][x]
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl FmtDisplay for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.fb.iter() {
            for &pixel in row.iter() {
                write!(f, "{}", if pixel { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Display, SCREEN_HEIGHT, SCREEN_WIDTH};

    #[test]
    fn test_toggle() {
        let mut display = Display::new();
        assert_eq!(display.toggle(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1), false);
        assert_eq!(display.fb[SCREEN_HEIGHT - 1][SCREEN_WIDTH - 1], true);
        assert_eq!(display.toggle(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1), true);
        assert_eq!(display.fb[SCREEN_HEIGHT - 1][SCREEN_WIDTH - 1], false);
        assert_eq!(display.toggle(0, 0), false);
        assert_eq!(display.fb[0][0], true);
        assert_eq!(display.toggle(0, 0), true);
        assert_eq!(display.fb[0][0], false);
        assert_eq!(display.toggle(SCREEN_WIDTH, SCREEN_HEIGHT), false);
    }

    #[test]
    fn test_dirty_cleared_by_snapshot() {
        let mut display = Display::new();
        assert!(!display.dirty);
        display.toggle(3, 4);
        assert!(display.dirty);
        let fb = display.fb();
        assert!(fb[4][3]);
        assert!(!display.dirty);
        display.clear();
        assert!(display.dirty);
        assert!(!display.is_set(3, 4));
    }

    #[test]
    fn test_render_text() {
        let mut display = Display::new();
        display.toggle(1, 0);
        let text = display.to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first.len(), SCREEN_WIDTH);
        assert!(first.starts_with(".#.."));
        assert_eq!(text.lines().count(), SCREEN_HEIGHT);
    }
}
