//! Tank configuration.
//!
//! Every tuning value the simulation reads lives here. The defaults reproduce
//! the classic 640x480 tank; a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Duration of one nominal 60 Hz tick in milliseconds. Speeds and per-tick
/// rates are expressed against this reference.
pub const REF_TICK_MS: f32 = 1000.0 / 60.0;

/// Convert a frame delta into nominal ticks. Non-finite deltas count as zero.
pub fn ticks(delta_ms: f32) -> f32 {
    if delta_ms.is_finite() {
        delta_ms / REF_TICK_MS
    } else {
        0.0
    }
}

// ── Playfield ────────────────────────────────────────────────────────────────

/// The drawable area plus the bands that wandering entities keep out of.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    /// Reserved band at the top (menu bar).
    pub hud_height: f32,
    /// Reserved band at the bottom (sand).
    pub floor_height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            hud_height: 75.0,
            floor_height: 40.0,
        }
    }
}

impl Playfield {
    /// Y coordinate at which sinking entities leave the tank.
    pub fn floor_line(&self) -> f32 {
        self.height - self.floor_height
    }
}

// ── Species tuning ───────────────────────────────────────────────────────────

/// What happens once an entity's hp reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathPolicy {
    /// Removed on the update that observes death.
    Immediate,
    /// Plays the death clip once, removed when it completes.
    AfterClip,
    /// Plays the death clip once while sinking, removed at the floor line.
    SinkToFloor,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    pub speed: f32,
    pub max_hp: f64,
    pub hungry_at: f64,
    pub starving_at: f64,
    /// Hp lost per nominal tick.
    pub hp_decay: f64,
    pub eat_radius: f32,
    /// Money level gained per nominal tick.
    pub money_rate: f32,
    /// Money level at which a coin is dropped.
    pub money_threshold: f32,
    pub death: DeathPolicy,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            max_hp: 100.0,
            hungry_at: 75.0,
            starving_at: 50.0,
            hp_decay: 0.1,
            eat_radius: 50.0,
            money_rate: 0.5,
            money_threshold: 100.0,
            death: DeathPolicy::SinkToFloor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub speed: f32,
    pub max_hp: f64,
    pub hungry_at: f64,
    pub hp_decay: f64,
    pub eat_radius: f32,
    /// How far a strike pushes the enemy away from the click.
    pub knockback_distance: f32,
    /// How long a strike overrides hunting.
    pub knockback_ms: f32,
    pub death: DeathPolicy,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            max_hp: 100.0,
            hungry_at: 75.0,
            hp_decay: 0.01,
            eat_radius: 50.0,
            knockback_distance: 60.0,
            knockback_ms: 400.0,
            death: DeathPolicy::Immediate,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendConfig {
    pub speed: f32,
    pub collect_radius: f32,
}

impl Default for FriendConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            collect_radius: 50.0,
        }
    }
}

/// Prices and limits used by the click dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_balance: f32,
    pub food_cost: f32,
    pub fish_cost: f32,
    /// Food pellets allowed in the tank at once.
    pub max_food: usize,
    /// 1..=3, selects the pellet quality and sprite row.
    pub food_tier: u32,
    pub weapon_damage: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: 300.0,
            food_cost: 25.0,
            fish_cost: 100.0,
            max_food: 1,
            food_tier: 1,
            weapon_damage: 30.0,
        }
    }
}

// ── Top level ────────────────────────────────────────────────────────────────

/// Static configuration for a tank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    pub playfield: Playfield,
    pub fish: FishConfig,
    pub enemy: EnemyConfig,
    pub friend: FriendConfig,
    pub economy: EconomyConfig,
    /// Fish placed in the tank by `Simulation::populate`.
    pub initial_fish: usize,
    /// Interval between checks that respawn an enemy when none is alive.
    pub enemy_respawn_ms: f32,
    /// Frame rate of looping sprite clips.
    pub draw_fps: f32,
    /// Units per nominal tick at which food and coins sink.
    pub sink_speed: f32,
    /// Optional RNG seed for reproducible tanks.
    pub rng_seed: Option<u64>,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            fish: FishConfig::default(),
            enemy: EnemyConfig::default(),
            friend: FriendConfig::default(),
            economy: EconomyConfig::default(),
            initial_fish: 10,
            enemy_respawn_ms: 60_000.0,
            draw_fps: 8.0,
            sink_speed: 1.0,
            rng_seed: None,
        }
    }
}

impl TankConfig {
    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: TankConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pf = &self.playfield;
        if !(pf.width > 0.0 && pf.height > 0.0) {
            return Err(ConfigError::Invalid("playfield must have a positive size"));
        }
        if pf.hud_height < 0.0 || pf.floor_height < 0.0 {
            return Err(ConfigError::Invalid("playfield bands must not be negative"));
        }
        if pf.hud_height + pf.floor_height >= pf.height {
            return Err(ConfigError::Invalid(
                "playfield bands leave no room for swimming",
            ));
        }
        if self.fish.speed <= 0.0 || self.enemy.speed <= 0.0 || self.friend.speed <= 0.0 {
            return Err(ConfigError::Invalid("species speeds must be positive"));
        }
        if self.fish.starving_at > self.fish.hungry_at {
            return Err(ConfigError::Invalid(
                "fish must become hungry before starving",
            ));
        }
        if !(1..=3).contains(&self.economy.food_tier) {
            return Err(ConfigError::Invalid("food tier must be between 1 and 3"));
        }
        if self.draw_fps <= 0.0 {
            return Err(ConfigError::Invalid("draw_fps must be positive"));
        }
        if self.enemy_respawn_ms <= 0.0 {
            return Err(ConfigError::Invalid("enemy_respawn_ms must be positive"));
        }
        Ok(())
    }
}
