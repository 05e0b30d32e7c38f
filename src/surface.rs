//! The single rendering primitive the core needs.

use crate::animation::Clip;

/// Axis-aligned box in surface coordinates, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// True when the point lies strictly inside the box.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x < x && x < self.x + self.width && self.y < y && y < self.y + self.height
    }
}

/// Something that can draw one frame of a sprite sheet. `mirrored` flips the
/// frame horizontally inside `rect`.
pub trait Surface {
    fn draw_frame(&mut self, clip: &Clip, frame: usize, rect: Rect, mirrored: bool);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub sheet: String,
    pub frame: usize,
    pub rect: Rect,
    pub mirrored: bool,
}

/// Keeps every draw call; used by headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn last(&self) -> Option<&DrawCall> {
        self.calls.last()
    }
}

impl Surface for RecordingSurface {
    fn draw_frame(&mut self, clip: &Clip, frame: usize, rect: Rect, mirrored: bool) {
        self.calls.push(DrawCall {
            sheet: clip.name.clone(),
            frame,
            rect,
            mirrored,
        });
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn draw_frame(&mut self, _clip: &Clip, _frame: usize, _rect: Rect, _mirrored: bool) {}
}
