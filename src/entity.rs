//! Entity base: shared body state, the species trait and the per-tick context.
//!
//! Every entity is a [`Body`] (position, goal, facing, animation) driven by a
//! [`Species`] implementation that supplies only what differs between kinds:
//! how it picks goals, what eating does, which clip it shows.
//!
//! The facing state machine lives entirely in `Body`:
//!
//! * `mirrored` changes only inside [`Body::set_target`].
//! * `turning` starts when `set_target` flips `mirrored` and ends when the
//!   turn clip completes.
//! * `eating` starts in [`Body::begin_eating`] and ends when the eat clip
//!   completes.
//!
//! A species without a turn (or eat) clip never enters that state.

use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};
use tracing::debug;

use crate::animation::{Advance, Animation, ClipRole, ClipSet};
use crate::assets::SpriteBank;
use crate::audio::Audio;
use crate::config::{ticks, Playfield, TankConfig};
use crate::registry::{EntityId, Registry};
use crate::surface::{Rect, Surface};

// ── Kinds ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Fish,
    Enemy,
    Food,
    Money,
    Friend,
    Stationary,
    OneShotEffect,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Fish,
        EntityKind::Enemy,
        EntityKind::Food,
        EntityKind::Money,
        EntityKind::Friend,
        EntityKind::Stationary,
        EntityKind::OneShotEffect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Fish => "fish",
            EntityKind::Enemy => "enemy",
            EntityKind::Food => "food",
            EntityKind::Money => "money",
            EntityKind::Friend => "friend",
            EntityKind::Stationary => "stationary",
            EntityKind::OneShotEffect => "one_shot_effect",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Outcome of seeking the nearest entity of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pursuit {
    /// No entity of that kind exists.
    Nothing,
    /// The nearest one is now the target.
    Chasing,
    /// It was within reach and has been removed; carries its quality.
    Consumed(f32),
}

/// Whether an entity survives the draw that just ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Finished,
}

/// Health-derived state. Species without hp report the default (all false).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vitals {
    pub hp: Option<f64>,
    pub hungry: bool,
    pub starving: bool,
    pub dead: bool,
}

// ── Body ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    /// Units per nominal tick.
    pub speed: f32,
    /// 0..=300. Nutrition or value handed over on removal, and sprite row.
    pub quality: f32,
    pub animation: Animation,
    target: Option<Point>,
    clips: Arc<ClipSet>,
    mirrored: bool,
    turning: bool,
    eating: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, quality: f32, clips: Arc<ClipSet>, draw_fps: f32) -> Self {
        Self {
            x,
            y,
            speed: 0.0,
            quality,
            animation: Animation::new(Self::row_for_quality(quality), draw_fps),
            target: None,
            clips,
            mirrored: false,
            turning: false,
            eating: false,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Sprite row for a quality tier: 100 → 0, 200 → 1, 300 → 2.
    pub fn row_for_quality(quality: f32) -> usize {
        (quality / 100.0 - 1.0).max(0.0).floor() as usize
    }

    pub fn width(&self) -> f32 {
        self.clips.swim().frame_width
    }

    pub fn height(&self) -> f32 {
        self.clips.swim().frame_height
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn clips(&self) -> &Arc<ClipSet> {
        &self.clips
    }

    pub fn target(&self) -> Option<Point> {
        self.target
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn is_turning(&self) -> bool {
        self.turning
    }

    pub fn is_eating(&self) -> bool {
        self.eating
    }

    /// Set a new goal and run the facing bookkeeping.
    pub fn set_target(&mut self, x: f32, y: f32) {
        let facing_right = if x > self.x {
            true
        } else if x < self.x {
            false
        } else {
            self.mirrored
        };
        if facing_right != self.mirrored {
            self.mirrored = facing_right;
            if self.clips.has(ClipRole::Turn) {
                self.turning = true;
                if !self.eating {
                    self.animation.rewind();
                }
            }
        }
        self.target = Some(Point { x, y });
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Enter the eating lock, restarting the eat clip if one is playing.
    pub fn begin_eating(&mut self) {
        if self.clips.has(ClipRole::Eat) {
            self.eating = true;
            self.animation.rewind();
        }
    }

    /// A once-clip for `role` has played to its end.
    fn clip_completed(&mut self, role: ClipRole) {
        match role {
            ClipRole::Turn => self.turning = false,
            ClipRole::Eat => self.eating = false,
            _ => {}
        }
    }

    /// Whether to draw flipped: the facing, inverted while a turn plays out
    /// toward a goal that is not to the right.
    pub fn draw_mirrored(&self) -> bool {
        let turning_back = self.turning
            && self
                .target
                .map_or(false, |t| self.x >= t.x.round());
        self.mirrored ^ turning_back
    }

    // ── Movement ─────────────────────────────────────────────────────────────

    /// Step toward the target on each axis independently, snapping onto it
    /// when it is within one step. Holds still while turning or eating.
    pub fn move_towards_target(&mut self, delta_ms: f32) {
        if self.turning || self.eating {
            return;
        }
        let Some(target) = self.target else {
            return;
        };
        let step = ticks(delta_ms) * self.speed;
        if step <= 0.0 {
            return;
        }
        self.x = approach(self.x, target.x, step);
        self.y = approach(self.y, target.y, step);
    }

    /// Pick a random goal inside the swimming area when there is no goal yet
    /// or the current one is within `speed` on both axes.
    pub fn target_random_location(
        &mut self,
        horizontal_only: bool,
        playfield: &Playfield,
        rng: &mut dyn RngCore,
    ) {
        let arrived = match self.target {
            None => true,
            Some(t) => (self.x - t.x).abs() <= self.speed && (self.y - t.y).abs() <= self.speed,
        };
        if !arrived {
            return;
        }
        let max_x = (playfield.width - self.width()).max(0.0);
        let x = rng.gen_range(0.0..=max_x);
        let y = if horizontal_only {
            self.y
        } else {
            let span = (playfield.height
                - playfield.hud_height
                - playfield.floor_height
                - self.height())
            .max(0.0);
            playfield.hud_height + rng.gen_range(0.0..=span)
        };
        self.set_target(x, y);
    }

    /// Aim at the nearest entity of `kind`; remove it from the registry if it
    /// is closer than `radius`. Eating the result is the caller's job (see
    /// [`Species::target_nearest`]).
    pub fn pursue(
        &mut self,
        registry: &mut Registry,
        kind: EntityKind,
        radius: f32,
        horizontal_only: bool,
    ) -> Pursuit {
        let Some(nearest) = registry.find_nearest(kind, self.x, self.y) else {
            return Pursuit::Nothing;
        };
        let y = if horizontal_only {
            self.y
        } else {
            nearest.position.y
        };
        self.set_target(nearest.position.x, y);
        if nearest.distance < radius {
            if let Some(quality) = registry.remove(nearest.id) {
                return Pursuit::Consumed(quality);
            }
        }
        Pursuit::Chasing
    }

    /// Fall straight down at `rate` units per nominal tick.
    pub fn sink(&mut self, delta_ms: f32, rate: f32) {
        self.y += ticks(delta_ms) * rate;
    }
}

fn approach(from: f32, to: f32, step: f32) -> f32 {
    let gap = to - from;
    if gap.abs() <= step {
        to
    } else {
        from + gap.signum() * step
    }
}

// ── Tick context ─────────────────────────────────────────────────────────────

/// Everything an entity may touch while it updates.
pub struct TickContext<'a> {
    pub registry: &'a mut Registry,
    pub sprites: &'a SpriteBank,
    pub config: &'a TankConfig,
    pub audio: &'a mut dyn Audio,
    pub rng: &'a mut dyn RngCore,
    /// Money collected by entities during this update.
    pub earnings: f32,
    despawn: bool,
}

impl<'a> TickContext<'a> {
    pub fn new(
        registry: &'a mut Registry,
        sprites: &'a SpriteBank,
        config: &'a TankConfig,
        audio: &'a mut dyn Audio,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            registry,
            sprites,
            config,
            audio,
            rng,
            earnings: 0.0,
            despawn: false,
        }
    }

    /// Ask the driver to remove the entity being updated once its update
    /// returns. Repeated requests are harmless.
    pub fn despawn(&mut self) {
        self.despawn = true;
    }

    pub fn despawn_requested(&self) -> bool {
        self.despawn
    }

    /// Add a new entity. It is first updated on the next tick.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let kind = entity.kind();
        let (x, y) = (entity.body.x, entity.body.y);
        let id = self.registry.add(entity);
        debug!(%id, %kind, x, y, "spawned");
        id
    }

    pub fn playfield(&self) -> &Playfield {
        &self.config.playfield
    }
}

// ── Species ──────────────────────────────────────────────────────────────────

/// Per-kind behavior. Defaults describe an inert object that sinks to the
/// floor; species override what they do differently.
pub trait Species: fmt::Debug {
    fn kind(&self) -> EntityKind;

    fn vitals(&self) -> Vitals {
        Vitals::default()
    }

    fn update(&mut self, body: &mut Body, delta_ms: f32, ctx: &mut TickContext<'_>) {
        body.sink(delta_ms, ctx.config.sink_speed);
        if body.y >= ctx.playfield().floor_line() {
            ctx.despawn();
        }
    }

    /// Receive nutrition from a consumed entity.
    fn eat(&mut self, body: &mut Body, _quality: f32, _ctx: &mut TickContext<'_>) {
        body.begin_eating();
    }

    /// Clip wanted for the current state, before fallbacks:
    /// dead > eating > turning > starving > default.
    fn clip_role(&self, body: &Body) -> ClipRole {
        let vitals = self.vitals();
        if vitals.dead {
            ClipRole::Die
        } else if body.is_eating() {
            ClipRole::Eat
        } else if body.is_turning() {
            ClipRole::Turn
        } else if vitals.starving {
            ClipRole::Hungry
        } else {
            ClipRole::Swim
        }
    }

    /// A once-clip finished playing. Returning `Finished` removes the entity.
    fn on_clip_complete(&mut self, _body: &mut Body, _role: ClipRole) -> Lifecycle {
        Lifecycle::Alive
    }

    /// Take a hit from the player at `from`. Returns false for kinds that
    /// cannot be struck.
    fn strike(
        &mut self,
        _body: &mut Body,
        _damage: f32,
        _from: Point,
        _playfield: &Playfield,
    ) -> bool {
        false
    }

    /// Seek the nearest entity of `kind` and eat it on arrival.
    fn target_nearest(
        &mut self,
        body: &mut Body,
        kind: EntityKind,
        radius: f32,
        horizontal_only: bool,
        ctx: &mut TickContext<'_>,
    ) -> Pursuit {
        let pursuit = body.pursue(ctx.registry, kind, radius, horizontal_only);
        if let Pursuit::Consumed(quality) = pursuit {
            debug!(eater = %self.kind(), prey = %kind, quality, "consumed");
            self.eat(body, quality, ctx);
        }
        pursuit
    }
}

// ── Entity ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Entity {
    pub body: Body,
    species: Box<dyn Species>,
}

impl Entity {
    pub fn new(body: Body, species: impl Species + 'static) -> Self {
        Self {
            body,
            species: Box::new(species),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.species.kind()
    }

    pub fn vitals(&self) -> Vitals {
        self.species.vitals()
    }

    /// The clip role this entity will draw with, after fallbacks.
    pub fn clip_role(&self) -> ClipRole {
        self.body
            .clips()
            .effective(self.species.clip_role(&self.body))
    }

    pub fn update(&mut self, delta_ms: f32, ctx: &mut TickContext<'_>) {
        self.species.update(&mut self.body, delta_ms, ctx);
    }

    pub fn strike(&mut self, damage: f32, from: Point, playfield: &Playfield) -> bool {
        self.species.strike(&mut self.body, damage, from, playfield)
    }

    /// Draw the current frame, then advance the frame clock. Skipped entirely
    /// when `delta_ms` is not a finite number.
    pub fn draw(&mut self, delta_ms: f32, surface: &mut dyn Surface) -> Lifecycle {
        if !delta_ms.is_finite() {
            return Lifecycle::Alive;
        }
        let role = self.clip_role();
        let clip = Arc::clone(self.body.clips().clip(role));
        self.body.animation.select(role, &clip);
        surface.draw_frame(
            &clip,
            self.body.animation.frame(),
            self.body.rect(),
            self.body.draw_mirrored(),
        );
        match self.body.animation.advance(delta_ms, &clip) {
            Advance::Completed => {
                self.body.clip_completed(role);
                self.species.on_clip_complete(&mut self.body, role)
            }
            Advance::Running | Advance::Held => Lifecycle::Alive,
        }
    }
}
