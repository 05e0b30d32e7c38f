use tracing::debug;

use crate::animation::ClipRole;
use crate::audio::variant;
use crate::config::{ticks, EnemyConfig, Playfield};
use crate::entity::{Body, EntityKind, Lifecycle, Point, Pursuit, Species, TickContext, Vitals};

use super::{settle_hp, Mortality};

/// Hunts fish when hungry. Clicking it deals damage and knocks it back,
/// which overrides hunting for a short while.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub hp: f64,
    /// Remaining knockback time in milliseconds.
    knockback_ms: f32,
    config: EnemyConfig,
    mortality: Mortality,
}

impl Enemy {
    pub fn new(config: EnemyConfig) -> Self {
        Self {
            hp: config.max_hp,
            knockback_ms: 0.0,
            config,
            mortality: Mortality::new(config.death),
        }
    }

    pub fn is_knocked_back(&self) -> bool {
        self.knockback_ms > 0.0
    }
}

impl Species for Enemy {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    /// Enemies have a single hunger threshold, so hungry and starving agree.
    fn vitals(&self) -> Vitals {
        let hungry = self.hp <= self.config.hungry_at;
        Vitals {
            hp: Some(self.hp),
            hungry,
            starving: hungry,
            dead: self.hp <= 0.0,
        }
    }

    fn update(&mut self, body: &mut Body, delta_ms: f32, ctx: &mut TickContext<'_>) {
        if self.vitals().dead {
            self.mortality
                .update(EntityKind::Enemy, body, delta_ms, ctx, None);
            return;
        }

        if self.is_knocked_back() {
            if delta_ms.is_finite() {
                self.knockback_ms -= delta_ms;
            }
        } else {
            let wander = if self.vitals().hungry {
                self.target_nearest(body, EntityKind::Fish, self.config.eat_radius, false, ctx)
                    == Pursuit::Nothing
            } else {
                true
            };
            if wander {
                body.target_random_location(false, &ctx.config.playfield, &mut *ctx.rng);
            }
        }
        body.move_towards_target(delta_ms);
        self.hp = settle_hp(self.hp - self.config.hp_decay * f64::from(ticks(delta_ms)));
    }

    fn eat(&mut self, body: &mut Body, quality: f32, ctx: &mut TickContext<'_>) {
        let sound = variant(&mut *ctx.rng, "chomp", 2);
        ctx.audio.play_effect(&sound);
        self.hp = (self.hp + f64::from(quality)).min(self.config.max_hp);
        body.begin_eating();
    }

    fn on_clip_complete(&mut self, body: &mut Body, role: ClipRole) -> Lifecycle {
        self.mortality.on_clip_complete(body, role)
    }

    fn strike(&mut self, body: &mut Body, damage: f32, from: Point, playfield: &Playfield) -> bool {
        self.hp = settle_hp(self.hp - f64::from(damage));

        // Push away from the click, measured from the centre of the sprite.
        let cx = body.x + body.width() / 2.0;
        let cy = body.y + body.height() / 2.0;
        let (dx, dy) = (cx - from.x, cy - from.y);
        let len = (dx * dx + dy * dy).sqrt();
        let (ux, uy) = if len > f32::EPSILON {
            (dx / len, dy / len)
        } else {
            (0.0, -1.0)
        };
        let max_x = (playfield.width - body.width()).max(0.0);
        let max_y = (playfield.floor_line() - body.height()).max(playfield.hud_height);
        let tx = (body.x + ux * self.config.knockback_distance).clamp(0.0, max_x);
        let ty = (body.y + uy * self.config.knockback_distance).clamp(playfield.hud_height, max_y);
        body.set_target(tx, ty);
        self.knockback_ms = self.config.knockback_ms;

        debug!(hp = self.hp, damage, "enemy struck");
        true
    }
}
