//! Rendering layer: all terminal I/O lives here.
//!
//! The simulation draws into a `TerminalSurface`, which only records where
//! each sprite goes. `render` then clears the screen and writes the border,
//! HUD, sprites and controls hint in one flush.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use aquarium::animation::Clip;
use aquarium::config::Playfield;
use aquarium::sim::TankStats;
use aquarium::surface::{Rect, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_MONEY: Color = Color::Yellow;
const C_HUD_COUNTS: Color = Color::Cyan;
const C_FISH: Color = Color::Yellow;
const C_FISH_HUNGRY: Color = Color::Green;
const C_FISH_DEAD: Color = Color::DarkGrey;
const C_ENEMY: Color = Color::Red;
const C_FOOD: Color = Color::DarkYellow;
const C_MONEY: Color = Color::Yellow;
const C_FRIEND: Color = Color::Magenta;
const C_EFFECT: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

// ── Surface ───────────────────────────────────────────────────────────────────

struct Sprite {
    col: u16,
    row: u16,
    glyph: &'static str,
    color: Color,
}

/// Maps playfield pixels onto the cells inside the border.
pub struct TerminalSurface {
    width: u16,
    height: u16,
    playfield: Playfield,
    sprites: Vec<Sprite>,
}

impl TerminalSurface {
    pub fn new(width: u16, height: u16, playfield: Playfield) -> Self {
        Self {
            width,
            height,
            playfield,
            sprites: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Inner drawing area: columns 1..width-1, rows 2..height-2.
    fn inner(&self) -> (f32, f32) {
        (
            self.width.saturating_sub(2).max(1) as f32,
            self.height.saturating_sub(4).max(1) as f32,
        )
    }

    fn to_cell(&self, x: f32, y: f32) -> (u16, u16) {
        let (cols, rows) = self.inner();
        let col = (x / self.playfield.width * cols).clamp(0.0, cols - 1.0);
        let row = (y / self.playfield.height * rows).clamp(0.0, rows - 1.0);
        (1 + col as u16, 2 + row as u16)
    }

    /// Playfield coordinates at the centre of a terminal cell. Cells above
    /// the border map to negative y, i.e. into the HUD band.
    pub fn to_playfield(&self, col: u16, row: u16) -> (f32, f32) {
        let (cols, rows) = self.inner();
        let x = (col as f32 - 1.0 + 0.5) / cols * self.playfield.width;
        let y = (row as f32 - 2.0 + 0.5) / rows * self.playfield.height;
        (x, y)
    }
}

impl Surface for TerminalSurface {
    fn draw_frame(&mut self, clip: &Clip, frame: usize, rect: Rect, mirrored: bool) {
        let (col, row) = self.to_cell(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
        let (glyph, color) = glyph_for(clip, frame, mirrored);
        self.sprites.push(Sprite {
            col,
            row,
            glyph,
            color,
        });
    }
}

/// Sprites face left unless mirrored.
fn glyph_for(clip: &Clip, frame: usize, mirrored: bool) -> (&'static str, Color) {
    match (clip.name.as_str(), mirrored) {
        ("smallswim", false) => ("<><", C_FISH),
        ("smallswim", true) => ("><>", C_FISH),
        ("hungryswim", false) => ("<><", C_FISH_HUNGRY),
        ("hungryswim", true) => ("><>", C_FISH_HUNGRY),
        ("smallturn", _) => ("<>", C_FISH),
        ("smalleat", false) => ("<@<", C_FISH),
        ("smalleat", true) => (">@>", C_FISH),
        ("smalldie", _) => ("x<>", C_FISH_DEAD),
        ("balrog", false) => ("<{Ö}", C_ENEMY),
        ("balrog", true) => ("{Ö}>", C_ENEMY),
        ("food", _) => ("•", C_FOOD),
        ("money", _) => ("$", C_MONEY),
        ("stinky", false) => ("@_", C_FRIEND),
        ("stinky", true) => ("_@", C_FRIEND),
        ("splash", _) => {
            let glyphs = ["·", "o", "O", "°"];
            (glyphs[frame * glyphs.len() / clip.columns.max(1) % glyphs.len()], C_EFFECT)
        }
        _ => ("?", Color::White),
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame from everything drawn since the last call.
pub fn render<W: Write>(
    out: &mut W,
    surface: &mut TerminalSurface,
    stats: &TankStats,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, surface)?;
    draw_hud(out, surface, stats)?;

    for sprite in surface.sprites.drain(..) {
        out.queue(cursor::MoveTo(sprite.col, sprite.row))?;
        out.queue(style::SetForegroundColor(sprite.color))?;
        out.queue(Print(sprite.glyph))?;
    }

    draw_controls_hint(out, surface)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, surface.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, surface: &TerminalSurface) -> std::io::Result<()> {
    let w = surface.width as usize;
    let h = surface.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(surface.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    surface: &TerminalSurface,
    stats: &TankStats,
) -> std::io::Result<()> {
    // Balance, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_MONEY))?;
    out.queue(Print(format!("$:{:>6.0}", stats.balance)))?;

    // Population, right
    let counts = format!(
        "fish {}  enemies {}  food {}  coins {}",
        stats.fish, stats.enemies, stats.food, stats.money
    );
    let rx = surface
        .width
        .saturating_sub(counts.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_COUNTS))?;
    out.queue(Print(&counts))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, surface: &TerminalSurface) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, surface.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "CLICK : feed / collect / strike   TOP BAR : buy fish   F : feed   P : friend   Q : quit",
    ))?;
    Ok(())
}
