use crate::audio::variant;
use crate::config::FriendConfig;
use crate::entity::{Body, EntityKind, Pursuit, Species, TickContext};

/// Patrols its lane and collects coins that sink past it.
#[derive(Clone, Debug, PartialEq)]
pub struct Friend {
    config: FriendConfig,
}

impl Friend {
    pub fn new(config: FriendConfig) -> Self {
        Self { config }
    }
}

impl Species for Friend {
    fn kind(&self) -> EntityKind {
        EntityKind::Friend
    }

    fn update(&mut self, body: &mut Body, delta_ms: f32, ctx: &mut TickContext<'_>) {
        let pursuit = self.target_nearest(
            body,
            EntityKind::Money,
            self.config.collect_radius,
            true,
            ctx,
        );
        if pursuit == Pursuit::Nothing {
            body.target_random_location(true, &ctx.config.playfield, &mut *ctx.rng);
        }
        body.move_towards_target(delta_ms);
    }

    fn eat(&mut self, body: &mut Body, quality: f32, ctx: &mut TickContext<'_>) {
        let sound = variant(&mut *ctx.rng, "POINTS", 4);
        ctx.audio.play_effect(&sound);
        ctx.earnings += quality;
        body.begin_eating();
    }
}
