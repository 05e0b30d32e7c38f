//! The simulation driver: owns the tank and runs update-then-draw for every
//! live entity each tick.
//!
//! Entities may remove or add entries while they update. The driver walks a
//! snapshot of ids taken at the start of the tick, checking each entity out
//! of the registry while it runs. Entries removed earlier in the tick are
//! skipped; entries added during the tick are first visited on the next one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::assets::SpriteBank;
use crate::audio::{variant, Audio};
use crate::config::TankConfig;
use crate::entity::{EntityKind, Lifecycle, Point, TickContext};
use crate::error::ConfigError;
use crate::registry::{EntityId, Registry};
use crate::species;
use crate::surface::Surface;

/// What a click did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickOutcome {
    BoughtFish(EntityId),
    CollectedMoney(f32),
    StruckEnemy(EntityId),
    DroppedFood(EntityId),
    /// The action was available but the balance did not cover it.
    TooPoor,
    Ignored,
}

/// Entity counts per kind plus the economy, for HUDs and logs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TankStats {
    pub fish: usize,
    pub enemies: usize,
    pub food: usize,
    pub money: usize,
    pub friends: usize,
    pub decorations: usize,
    pub balance: f32,
    pub frames: u64,
}

pub struct Simulation<A> {
    registry: Registry,
    sprites: SpriteBank,
    config: TankConfig,
    rng: StdRng,
    audio: A,
    balance: f32,
    /// Time left until the next enemy respawn check.
    respawn_ms: f32,
    last_timestamp: Option<f64>,
    frames: u64,
}

impl<A: Audio> Simulation<A> {
    pub fn new(config: TankConfig, sprites: SpriteBank, audio: A) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            registry: Registry::new(),
            sprites,
            balance: config.economy.starting_balance,
            respawn_ms: config.enemy_respawn_ms,
            config,
            rng,
            audio,
            last_timestamp: None,
            frames: 0,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn config(&self) -> &TankConfig {
        &self.config
    }

    pub fn sprites(&self) -> &SpriteBank {
        &self.sprites
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn balance(&self) -> f32 {
        self.balance
    }

    // ── Setup ────────────────────────────────────────────────────────────────

    /// Start music, add the first enemy and the starting school of fish.
    pub fn populate(&mut self) {
        self.audio.play_loop("Insaniq2");
        let hud = self.config.playfield.hud_height;
        self.spawn(EntityKind::Enemy, 1.0, hud);
        for _ in 0..self.config.initial_fish {
            let (x, y) = self.random_point(EntityKind::Fish);
            self.spawn(EntityKind::Fish, x, y);
        }
        info!(
            fish = self.config.initial_fish,
            balance = self.balance,
            "tank populated"
        );
    }

    /// Create and add an entity of `kind` using the preloaded sprites.
    pub fn spawn(&mut self, kind: EntityKind, x: f32, y: f32) -> EntityId {
        let sprites = &self.sprites;
        let config = &self.config;
        let entity = match kind {
            EntityKind::Fish => species::fish(sprites, config, x, y),
            EntityKind::Enemy => species::enemy(sprites, config, x, y),
            EntityKind::Food => species::food(sprites, config, x, y, config.economy.food_tier),
            EntityKind::Money => species::money(sprites, config, x, y),
            EntityKind::Friend => species::friend(sprites, config, x, y),
            EntityKind::Stationary => {
                species::stationary(sprites.for_kind(kind).clone(), config, x, y)
            }
            EntityKind::OneShotEffect => species::one_shot(sprites.for_kind(kind).clone(), x, y),
        };
        let id = self.registry.add(entity);
        debug!(%id, %kind, x, y, "spawned");
        id
    }

    /// Top-left corner that keeps a sprite of `kind` between the walls, the
    /// HUD band and the floor line.
    fn random_point(&mut self, kind: EntityKind) -> (f32, f32) {
        let pf = self.config.playfield;
        let frame = self.sprites.for_kind(kind).swim();
        let max_x = (pf.width - frame.frame_width).max(0.0);
        let max_y = (pf.floor_line() - frame.frame_height).max(pf.hud_height);
        let x = self.rng.gen_range(0.0..=max_x);
        let y = self.rng.gen_range(pf.hud_height..=max_y);
        (x, y)
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Run one tick at host time `timestamp_ms`. The first call has no
    /// previous timestamp, so its delta is NaN and entities skip their draw.
    pub fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) {
        let delta = self
            .last_timestamp
            .map_or(f32::NAN, |last| (timestamp_ms - last) as f32);
        self.last_timestamp = Some(timestamp_ms);
        self.tick(delta, surface);
    }

    /// Update then draw every entity present at the start of the tick.
    pub fn tick(&mut self, delta_ms: f32, surface: &mut dyn Surface) {
        self.frames += 1;
        let mut earnings = 0.0;
        let mut despawned = 0usize;

        for id in self.registry.ids() {
            let Some(mut entity) = self.registry.check_out(id) else {
                continue;
            };

            let mut ctx = TickContext::new(
                &mut self.registry,
                &self.sprites,
                &self.config,
                &mut self.audio,
                &mut self.rng,
            );
            entity.update(delta_ms, &mut ctx);
            earnings += ctx.earnings;
            let keep = !ctx.despawn_requested()
                && entity.draw(delta_ms, surface) == Lifecycle::Alive;

            if keep {
                self.registry.check_in(id, entity);
            } else {
                self.registry.remove(id);
                despawned += 1;
                debug!(%id, kind = %entity.kind(), "despawned");
            }
        }

        self.balance += earnings;
        self.respawn_enemies(delta_ms);
        trace!(
            frame = self.frames,
            entities = self.registry.len(),
            despawned,
            earnings,
            "tick"
        );
    }

    fn respawn_enemies(&mut self, delta_ms: f32) {
        if !delta_ms.is_finite() {
            return;
        }
        self.respawn_ms -= delta_ms;
        if self.respawn_ms > 0.0 {
            return;
        }
        self.respawn_ms = self.config.enemy_respawn_ms;
        if self.registry.count(EntityKind::Enemy) == 0 {
            let hud = self.config.playfield.hud_height;
            let id = self.spawn(EntityKind::Enemy, 1.0, hud);
            info!(%id, "enemy respawned");
        }
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Dispatch a click at surface coordinates `(x, y)`.
    ///
    /// The HUD band buys a fish. Below it, a coin is collected, an enemy is
    /// struck, or failing both a food pellet is dropped.
    pub fn click(&mut self, x: f32, y: f32) -> ClickOutcome {
        let economy = self.config.economy;

        if y < self.config.playfield.hud_height {
            if !self.afford(economy.fish_cost) {
                return ClickOutcome::TooPoor;
            }
            let (fx, fy) = self.random_point(EntityKind::Fish);
            let id = self.spawn(EntityKind::Fish, fx, fy);
            self.spawn(EntityKind::OneShotEffect, fx, fy);
            let sound = variant(&mut self.rng, "SPLASH", 3);
            self.audio.play_effect(&sound);
            info!(%id, balance = self.balance, "bought fish");
            return ClickOutcome::BoughtFish(id);
        }

        if let Some(id) = self.registry.intersects(EntityKind::Money, x, y) {
            if let Some(value) = self.registry.remove(id) {
                self.balance += value;
                let sound = variant(&mut self.rng, "POINTS", 4);
                self.audio.play_effect(&sound);
                info!(%id, value, balance = self.balance, "collected money");
                return ClickOutcome::CollectedMoney(value);
            }
        }

        if let Some(id) = self.registry.intersects(EntityKind::Enemy, x, y) {
            let playfield = self.config.playfield;
            if let Some(enemy) = self.registry.get_mut(id) {
                if enemy.strike(economy.weapon_damage, Point { x, y }, &playfield) {
                    self.audio.play_effect("HIT");
                    info!(%id, hp = ?enemy.vitals().hp, "struck enemy");
                    return ClickOutcome::StruckEnemy(id);
                }
            }
        }

        if self.registry.count(EntityKind::Food) >= economy.max_food {
            return ClickOutcome::Ignored;
        }
        if !self.afford(economy.food_cost) {
            return ClickOutcome::TooPoor;
        }
        let id = self.spawn(EntityKind::Food, x, y);
        self.audio.play_effect("DROPFOOD");
        info!(%id, balance = self.balance, "dropped food");
        ClickOutcome::DroppedFood(id)
    }

    /// Deduct `cost` if the balance covers it; buzz otherwise.
    fn afford(&mut self, cost: f32) -> bool {
        if self.balance >= cost {
            self.balance -= cost;
            true
        } else {
            self.audio.play_effect("BUZZER");
            false
        }
    }

    pub fn stats(&self) -> TankStats {
        let mut stats = TankStats {
            balance: self.balance,
            frames: self.frames,
            ..TankStats::default()
        };
        for (_, entity) in self.registry.iter() {
            match entity.kind() {
                EntityKind::Fish => stats.fish += 1,
                EntityKind::Enemy => stats.enemies += 1,
                EntityKind::Food => stats.food += 1,
                EntityKind::Money => stats.money += 1,
                EntityKind::Friend => stats.friends += 1,
                EntityKind::Stationary | EntityKind::OneShotEffect => stats.decorations += 1,
            }
        }
        stats
    }
}
