//! Species with no will of their own.

use crate::animation::ClipRole;
use crate::entity::{Body, EntityKind, Lifecycle, Species, TickContext};

/// A pellet sinking to the floor. Uses the default sink behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food;

impl Species for Food {
    fn kind(&self) -> EntityKind {
        EntityKind::Food
    }
}

/// A coin sinking to the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Money;

impl Species for Money {
    fn kind(&self) -> EntityKind {
        EntityKind::Money
    }
}

/// Decoration: loops its clip in place forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stationary;

impl Species for Stationary {
    fn kind(&self) -> EntityKind {
        EntityKind::Stationary
    }

    fn update(&mut self, _body: &mut Body, _delta_ms: f32, _ctx: &mut TickContext<'_>) {}
}

/// Plays its clip once and disappears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OneShotEffect;

impl Species for OneShotEffect {
    fn kind(&self) -> EntityKind {
        EntityKind::OneShotEffect
    }

    fn update(&mut self, _body: &mut Body, _delta_ms: f32, _ctx: &mut TickContext<'_>) {}

    fn on_clip_complete(&mut self, _body: &mut Body, _role: ClipRole) -> Lifecycle {
        Lifecycle::Finished
    }
}
