//! Sprite-sheet clips and the frame clock that plays them.
//!
//! A clip is a rows x columns grid of frames. Each entity plays one row of
//! the clip its state resolves to, selected by its animation index. The
//! frame counter is a continuous value; the frame drawn is its floor.

use std::collections::HashMap;
use std::sync::Arc;

/// How a clip behaves when playback runs past its last frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackMode {
    /// Wrap back to the first frame of the row.
    Loop,
    /// Freeze on the last frame and report completion once.
    Once,
}

/// A loaded sprite sheet: grid layout, playback mode and frame size.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub mode: PlaybackMode,
    pub frame_width: f32,
    pub frame_height: f32,
}

impl Clip {
    pub fn frame_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Index of the first frame of `row`, clamped to the last row of the sheet.
    pub fn row_base(&self, row: usize) -> usize {
        row.min(self.rows.saturating_sub(1)) * self.columns
    }
}

// ── Clip roles ───────────────────────────────────────────────────────────────

/// Which animation an entity wants to show. Listed from highest to lowest
/// draw precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipRole {
    Die,
    Eat,
    Turn,
    Hungry,
    Swim,
}

/// The clips available to one species. `Swim` is always present; every other
/// role falls back to it.
#[derive(Clone, Debug)]
pub struct ClipSet {
    swim: Arc<Clip>,
    extra: HashMap<ClipRole, Arc<Clip>>,
}

impl ClipSet {
    pub fn new(swim: Arc<Clip>) -> Self {
        Self {
            swim,
            extra: HashMap::new(),
        }
    }

    pub fn with(mut self, role: ClipRole, clip: Arc<Clip>) -> Self {
        if role == ClipRole::Swim {
            self.swim = clip;
        } else {
            self.extra.insert(role, clip);
        }
        self
    }

    pub fn has(&self, role: ClipRole) -> bool {
        role == ClipRole::Swim || self.extra.contains_key(&role)
    }

    /// The role actually played for `role` once fallbacks are applied.
    pub fn effective(&self, role: ClipRole) -> ClipRole {
        if self.has(role) {
            role
        } else {
            ClipRole::Swim
        }
    }

    pub fn clip(&self, role: ClipRole) -> &Arc<Clip> {
        self.extra.get(&role).unwrap_or(&self.swim)
    }

    pub fn swim(&self) -> &Arc<Clip> {
        &self.swim
    }
}

// ── Frame clock ──────────────────────────────────────────────────────────────

/// Result of advancing the frame clock by one draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Running,
    /// A `Once` clip just reached its end. Reported exactly once per playback.
    Completed,
    /// A `Once` clip is frozen on its last frame.
    Held,
}

/// Per-entity playback state.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    /// Row of the sheet to play.
    pub index: usize,
    pub draw_fps: f32,
    current_frame: f32,
    role: Option<ClipRole>,
    finished: bool,
}

impl Animation {
    pub fn new(index: usize, draw_fps: f32) -> Self {
        Self {
            index,
            draw_fps,
            current_frame: 0.0,
            role: None,
            finished: false,
        }
    }

    pub fn current_frame(&self) -> f32 {
        self.current_frame
    }

    /// Frame index to draw.
    pub fn frame(&self) -> usize {
        self.current_frame.max(0.0).floor() as usize
    }

    pub fn role(&self) -> Option<ClipRole> {
        self.role
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Force the next `select` to start its clip from the first frame.
    pub fn rewind(&mut self) {
        self.role = None;
        self.finished = false;
    }

    /// Bind the clock to the clip resolved for this draw. A change of role
    /// restarts playback at the row's first frame; a frame outside the row
    /// (after an index change) is pulled back to it.
    pub fn select(&mut self, role: ClipRole, clip: &Clip) {
        let base = clip.row_base(self.index) as f32;
        let end = base + clip.columns as f32;
        if self.role != Some(role) {
            self.role = Some(role);
            self.finished = false;
            self.current_frame = base;
        } else if self.current_frame < base || self.current_frame >= end {
            self.current_frame = base;
        }
    }

    /// Move the counter forward by `delta_ms`. Non-finite or negative deltas
    /// do nothing.
    pub fn advance(&mut self, delta_ms: f32, clip: &Clip) -> Advance {
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            return Advance::Running;
        }
        if self.finished {
            return Advance::Held;
        }
        let base = clip.row_base(self.index) as f32;
        let end = base + clip.columns as f32;
        self.current_frame += (delta_ms / 1000.0) * self.draw_fps;
        if self.current_frame < end {
            return Advance::Running;
        }
        match clip.mode {
            PlaybackMode::Loop => {
                self.current_frame = base;
                Advance::Running
            }
            PlaybackMode::Once => {
                self.current_frame = end - 1.0;
                self.finished = true;
                Advance::Completed
            }
        }
    }
}
