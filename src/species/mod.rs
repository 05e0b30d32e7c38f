//! Concrete species and their constructors.

mod enemy;
mod fish;
mod friend;
mod inert;

use std::sync::Arc;

use tracing::debug;

pub use enemy::Enemy;
pub use fish::Fish;
pub use friend::Friend;
pub use inert::{Food, Money, OneShotEffect, Stationary};

use crate::animation::{ClipRole, ClipSet};
use crate::assets::SpriteBank;
use crate::config::{DeathPolicy, TankConfig};
use crate::entity::{Body, Entity, EntityKind, Lifecycle, TickContext};

/// Draw rate of one-shot effects.
pub const EFFECT_FPS: f32 = 60.0;

/// Hp within this distance of zero is zero.
const HP_EPSILON: f64 = 1e-9;

/// Snap hp left a rounding error away from zero onto zero.
pub(crate) fn settle_hp(hp: f64) -> f64 {
    if hp.abs() < HP_EPSILON {
        0.0
    } else {
        hp
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn fish(sprites: &SpriteBank, config: &TankConfig, x: f32, y: f32) -> Entity {
    let body = Body::new(x, y, 100.0, Arc::clone(&sprites.fish), config.draw_fps)
        .with_speed(config.fish.speed);
    Entity::new(body, Fish::new(config.fish))
}

pub fn enemy(sprites: &SpriteBank, config: &TankConfig, x: f32, y: f32) -> Entity {
    let body = Body::new(x, y, 100.0, Arc::clone(&sprites.enemy), config.draw_fps)
        .with_speed(config.enemy.speed);
    Entity::new(body, Enemy::new(config.enemy))
}

/// A pellet of the given tier (1..=3); quality is 100 per tier.
pub fn food(sprites: &SpriteBank, config: &TankConfig, x: f32, y: f32, tier: u32) -> Entity {
    let quality = 100.0 * tier.clamp(1, 3) as f32;
    let body = Body::new(x, y, quality, Arc::clone(&sprites.food), config.draw_fps);
    Entity::new(body, Food)
}

pub fn money(sprites: &SpriteBank, config: &TankConfig, x: f32, y: f32) -> Entity {
    let body = Body::new(x, y, 100.0, Arc::clone(&sprites.money), config.draw_fps);
    Entity::new(body, Money)
}

/// A coin collector confined to the horizontal lane at `y`.
pub fn friend(sprites: &SpriteBank, config: &TankConfig, x: f32, y: f32) -> Entity {
    let body = Body::new(x, y, 100.0, Arc::clone(&sprites.friend), config.draw_fps)
        .with_speed(config.friend.speed);
    Entity::new(body, Friend::new(config.friend))
}

pub fn stationary(clips: Arc<ClipSet>, config: &TankConfig, x: f32, y: f32) -> Entity {
    let body = Body::new(x, y, 100.0, clips, config.draw_fps);
    Entity::new(body, Stationary)
}

pub fn one_shot(clips: Arc<ClipSet>, x: f32, y: f32) -> Entity {
    let body = Body::new(x, y, 100.0, clips, EFFECT_FPS);
    Entity::new(body, OneShotEffect)
}

// ── Death handling ───────────────────────────────────────────────────────────

/// Drives an entity from the moment its hp runs out until it leaves the
/// tank, following its [`DeathPolicy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Mortality {
    pub policy: DeathPolicy,
    dying: bool,
}

impl Mortality {
    pub fn new(policy: DeathPolicy) -> Self {
        Self {
            policy,
            dying: false,
        }
    }

    /// Run one dead update. The death sound plays only on the first one.
    pub fn update(
        &mut self,
        kind: EntityKind,
        body: &mut Body,
        delta_ms: f32,
        ctx: &mut TickContext<'_>,
        sound: Option<&str>,
    ) {
        if !self.dying {
            self.dying = true;
            body.clear_target();
            if let Some(sound) = sound {
                ctx.audio.play_effect(sound);
            }
            debug!(%kind, x = body.x, y = body.y, policy = ?self.policy, "died");
        }
        match self.effective_policy(body) {
            DeathPolicy::Immediate => ctx.despawn(),
            DeathPolicy::AfterClip => {}
            DeathPolicy::SinkToFloor => {
                body.sink(delta_ms, body.speed);
                if body.y >= ctx.playfield().floor_line() {
                    ctx.despawn();
                }
            }
        }
    }

    pub fn on_clip_complete(&self, body: &Body, role: ClipRole) -> Lifecycle {
        if self.dying
            && role == ClipRole::Die
            && self.effective_policy(body) == DeathPolicy::AfterClip
        {
            Lifecycle::Finished
        } else {
            Lifecycle::Alive
        }
    }

    /// Waiting on a death clip the species does not have would never end.
    fn effective_policy(&self, body: &Body) -> DeathPolicy {
        if self.policy == DeathPolicy::AfterClip && !body.clips().has(ClipRole::Die) {
            DeathPolicy::Immediate
        } else {
            self.policy
        }
    }
}
