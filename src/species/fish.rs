use tracing::debug;

use crate::animation::ClipRole;
use crate::audio::variant;
use crate::config::{ticks, FishConfig};
use crate::entity::{Body, EntityKind, Lifecycle, Pursuit, Species, TickContext, Vitals};

use super::{settle_hp, Mortality};

/// Swims around, eats food when hungry and drops a coin every so often.
#[derive(Clone, Debug, PartialEq)]
pub struct Fish {
    pub hp: f64,
    /// Grows every tick; a coin drops when it reaches the threshold.
    pub money_level: f32,
    config: FishConfig,
    mortality: Mortality,
}

impl Fish {
    pub fn new(config: FishConfig) -> Self {
        Self {
            hp: config.max_hp,
            money_level: 0.0,
            config,
            mortality: Mortality::new(config.death),
        }
    }
}

impl Species for Fish {
    fn kind(&self) -> EntityKind {
        EntityKind::Fish
    }

    fn vitals(&self) -> Vitals {
        Vitals {
            hp: Some(self.hp),
            hungry: self.hp <= self.config.hungry_at,
            starving: self.hp <= self.config.starving_at,
            dead: self.hp <= 0.0,
        }
    }

    fn update(&mut self, body: &mut Body, delta_ms: f32, ctx: &mut TickContext<'_>) {
        if self.vitals().dead {
            self.mortality
                .update(EntityKind::Fish, body, delta_ms, ctx, Some("DIE"));
            return;
        }

        let wander = if self.vitals().hungry {
            self.target_nearest(body, EntityKind::Food, self.config.eat_radius, false, ctx)
                == Pursuit::Nothing
        } else {
            true
        };
        if wander {
            body.target_random_location(false, &ctx.config.playfield, &mut *ctx.rng);
        }
        body.move_towards_target(delta_ms);

        let elapsed = ticks(delta_ms);
        self.hp = settle_hp(self.hp - self.config.hp_decay * f64::from(elapsed));
        self.money_level += self.config.money_rate * elapsed;
        if self.money_level >= self.config.money_threshold {
            self.money_level = 0.0;
            let coin = super::money(ctx.sprites, ctx.config, body.x, body.y);
            ctx.spawn(coin);
        }
    }

    fn eat(&mut self, body: &mut Body, quality: f32, ctx: &mut TickContext<'_>) {
        let sound = variant(&mut *ctx.rng, "SLURP", 3);
        ctx.audio.play_effect(&sound);
        self.hp = (self.hp + f64::from(quality)).min(self.config.max_hp);
        debug!(hp = self.hp, quality, "fish ate");
        body.begin_eating();
    }

    fn on_clip_complete(&mut self, body: &mut Body, role: ClipRole) -> Lifecycle {
        self.mortality.on_clip_complete(body, role)
    }
}
