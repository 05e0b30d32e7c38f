use aquarium::assets::{ClipCache, SheetManifest, SpriteBank};
use aquarium::audio::AudioLog;
use aquarium::config::{DeathPolicy, TankConfig, REF_TICK_MS};
use aquarium::entity::{EntityKind, Point};
use aquarium::error::ConfigError;
use aquarium::sim::{ClickOutcome, Simulation};
use aquarium::surface::{NullSurface, RecordingSurface};

fn sprites() -> SpriteBank {
    SpriteBank::load(&mut ClipCache::new(SheetManifest::default())).expect("built-in sheets")
}

fn seeded_config() -> TankConfig {
    TankConfig {
        rng_seed: Some(42),
        ..TankConfig::default()
    }
}

fn make_sim(config: TankConfig) -> Simulation<AudioLog> {
    Simulation::new(config, sprites(), AudioLog::default()).expect("valid config")
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_rejects_invalid_config() {
    let config = TankConfig {
        draw_fps: 0.0,
        ..TankConfig::default()
    };
    let result = Simulation::new(config, sprites(), AudioLog::default());
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn populate_adds_enemy_and_school() {
    let mut sim = make_sim(seeded_config());
    sim.populate();

    let stats = sim.stats();
    assert_eq!(stats.fish, 10);
    assert_eq!(stats.enemies, 1);
    assert_eq!(stats.balance, 300.0);
    assert_eq!(sim.audio().loops, vec!["Insaniq2".to_string()]);
}

// ── Ticking ───────────────────────────────────────────────────────────────────

#[test]
fn first_frame_has_no_delta_and_draws_nothing() {
    let mut sim = make_sim(seeded_config());
    sim.populate();
    let mut surface = RecordingSurface::default();

    sim.frame(1000.0, &mut surface);
    assert!(surface.calls.is_empty());

    sim.frame(1000.0 + REF_TICK_MS as f64, &mut surface);
    assert_eq!(surface.calls.len(), sim.registry().len());
}

#[test]
fn draw_order_follows_registry_order() {
    let mut sim = make_sim(seeded_config());
    sim.spawn(EntityKind::Food, 100.0, 100.0);
    sim.spawn(EntityKind::Money, 300.0, 100.0);
    let mut surface = RecordingSurface::default();

    sim.tick(REF_TICK_MS, &mut surface);
    let sheets: Vec<_> = surface.calls.iter().map(|c| c.sheet.as_str()).collect();
    assert_eq!(sheets, vec!["food", "money"]);
}

#[test]
fn food_eaten_mid_tick_is_not_visited() {
    let mut config = seeded_config();
    config.fish.hungry_at = 100.0;
    let mut sim = make_sim(config);
    sim.spawn(EntityKind::Fish, 100.0, 100.0);
    sim.spawn(EntityKind::Food, 100.0, 110.0);
    sim.spawn(EntityKind::Fish, 100.0, 120.0);
    let mut surface = RecordingSurface::default();

    sim.tick(REF_TICK_MS, &mut surface);

    let stats = sim.stats();
    assert_eq!(stats.food, 0);
    assert_eq!(stats.fish, 2);
    assert_eq!(sim.audio().count("SLURP"), 1);
    assert_eq!(surface.calls.len(), 2);
    assert!(surface.calls.iter().all(|c| c.sheet != "food"));
}

#[test]
fn starved_fish_dies_and_sinks_instead_of_vanishing() {
    let mut sim = make_sim(seeded_config());
    let id = sim.spawn(EntityKind::Fish, 300.0, 200.0);
    let mut surface = NullSurface;

    // 100 hp at 0.1 per tick
    for _ in 0..999 {
        sim.tick(REF_TICK_MS, &mut surface);
    }
    assert!(!sim.registry().get(id).unwrap().vitals().dead);

    sim.tick(REF_TICK_MS, &mut surface);
    let vitals = sim.registry().get(id).unwrap().vitals();
    assert!(vitals.dead);
    assert_eq!(vitals.hp, Some(0.0));

    // Still in the tank after its first dead update, now playing its death clip
    sim.tick(REF_TICK_MS, &mut surface);
    let fish = sim.registry().get(id).unwrap();
    assert_eq!(fish.clip_role(), aquarium::animation::ClipRole::Die);
    assert_eq!(sim.audio().count("DIE"), 1);

    for _ in 0..500 {
        sim.tick(REF_TICK_MS, &mut surface);
        if !sim.registry().contains(id) {
            break;
        }
    }
    assert!(!sim.registry().contains(id));
    assert_eq!(sim.audio().count("DIE"), 1);
}

#[test]
fn after_clip_death_waits_for_die_clip() {
    let mut config = seeded_config();
    config.fish.death = DeathPolicy::AfterClip;
    config.fish.hp_decay = 60.0;
    let mut sim = make_sim(config);
    let id = sim.spawn(EntityKind::Fish, 300.0, 200.0);
    let mut surface = NullSurface;

    // Dead after two ticks; the die clip then takes about 75 more
    for _ in 0..3 {
        sim.tick(REF_TICK_MS, &mut surface);
    }
    let resting_y = sim.registry().get(id).unwrap().body.y;
    for _ in 0..17 {
        sim.tick(REF_TICK_MS, &mut surface);
    }
    let fish = sim.registry().get(id).unwrap();
    assert!(fish.vitals().dead);
    assert_eq!(fish.body.y, resting_y);

    for _ in 0..100 {
        sim.tick(REF_TICK_MS, &mut surface);
    }
    assert!(!sim.registry().contains(id));
}

#[test]
fn enemy_respawns_when_tank_is_empty() {
    let config = TankConfig {
        enemy_respawn_ms: 1000.0,
        ..seeded_config()
    };
    let mut sim = make_sim(config);
    let mut surface = NullSurface;

    sim.tick(500.0, &mut surface);
    assert_eq!(sim.registry().count(EntityKind::Enemy), 0);
    sim.tick(500.0, &mut surface);
    assert_eq!(sim.registry().count(EntityKind::Enemy), 1);

    sim.tick(500.0, &mut surface);
    sim.tick(500.0, &mut surface);
    assert_eq!(sim.registry().count(EntityKind::Enemy), 1);
}

#[test]
fn fish_earn_coins_over_time() {
    let mut sim = make_sim(seeded_config());
    sim.spawn(EntityKind::Fish, 300.0, 200.0);
    let mut surface = NullSurface;

    for _ in 0..200 {
        sim.tick(REF_TICK_MS, &mut surface);
    }
    assert_eq!(sim.stats().money, 1);
}

// ── Clicks ────────────────────────────────────────────────────────────────────

#[test]
fn random_fish_start_inside_the_tank() {
    let mut config = seeded_config();
    config.initial_fish = 50;
    config.economy.starting_balance = 5000.0;
    let mut sim = make_sim(config);
    sim.populate();
    for _ in 0..40 {
        sim.click(320.0, 10.0);
    }

    let pf = sim.config().playfield;
    let fish: Vec<_> = sim.registry().entries_of_type(EntityKind::Fish).collect();
    assert_eq!(fish.len(), 90);
    for (_, entity) in fish {
        let rect = entity.body.rect();
        assert!(rect.x >= 0.0 && rect.x + rect.width <= pf.width);
        assert!(rect.y >= pf.hud_height && rect.y + rect.height <= pf.floor_line());
    }
}

#[test]
fn click_in_hud_buys_fish() {
    let mut sim = make_sim(seeded_config());

    let outcome = sim.click(50.0, 10.0);
    assert!(matches!(outcome, ClickOutcome::BoughtFish(_)));
    assert_eq!(sim.balance(), 200.0);

    let stats = sim.stats();
    assert_eq!(stats.fish, 1);
    assert_eq!(stats.decorations, 1);
    assert_eq!(sim.audio().count("SPLASH"), 1);
}

#[test]
fn click_in_hud_without_funds_buzzes() {
    let mut config = seeded_config();
    config.economy.starting_balance = 50.0;
    let mut sim = make_sim(config);

    assert_eq!(sim.click(50.0, 10.0), ClickOutcome::TooPoor);
    assert_eq!(sim.balance(), 50.0);
    assert_eq!(sim.stats().fish, 0);
    assert_eq!(sim.audio().count("BUZZER"), 1);
}

#[test]
fn click_on_water_drops_one_pellet() {
    let mut sim = make_sim(seeded_config());

    let outcome = sim.click(300.0, 300.0);
    assert!(matches!(outcome, ClickOutcome::DroppedFood(_)));
    assert_eq!(sim.balance(), 275.0);
    assert_eq!(sim.audio().count("DROPFOOD"), 1);

    assert_eq!(sim.click(100.0, 300.0), ClickOutcome::Ignored);
    assert_eq!(sim.stats().food, 1);
    assert_eq!(sim.balance(), 275.0);
}

#[test]
fn click_on_coin_collects_it() {
    let mut sim = make_sim(seeded_config());
    let coin = sim.spawn(EntityKind::Money, 300.0, 300.0);

    assert_eq!(sim.click(320.0, 320.0), ClickOutcome::CollectedMoney(100.0));
    assert_eq!(sim.balance(), 400.0);
    assert!(!sim.registry().contains(coin));
    assert_eq!(sim.audio().count("POINTS"), 1);
}

#[test]
fn click_on_enemy_strikes_it() {
    let mut sim = make_sim(seeded_config());
    let enemy = sim.spawn(EntityKind::Enemy, 200.0, 200.0);

    assert_eq!(sim.click(250.0, 280.0), ClickOutcome::StruckEnemy(enemy));
    assert_eq!(sim.balance(), 300.0);
    assert_eq!(sim.audio().count("HIT"), 1);

    let struck = sim.registry().get(enemy).unwrap();
    assert_eq!(struck.vitals().hp, Some(70.0));
    assert_eq!(struck.body.target(), Some(Point { x: 260.0, y: 200.0 }));

    sim.tick(REF_TICK_MS, &mut NullSurface);
    assert_eq!(sim.registry().get(enemy).unwrap().body.x, 203.0);
}

#[test]
fn friend_earnings_reach_balance() {
    let mut sim = make_sim(seeded_config());
    sim.spawn(EntityKind::Friend, 100.0, 280.0);
    sim.spawn(EntityKind::Money, 110.0, 250.0);

    sim.tick(REF_TICK_MS, &mut NullSurface);
    assert_eq!(sim.balance(), 400.0);
    assert_eq!(sim.stats().money, 0);
}
