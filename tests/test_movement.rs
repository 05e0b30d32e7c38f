use std::sync::Arc;

use aquarium::assets::{ClipCache, SheetManifest, SpriteBank};
use aquarium::config::{ticks, Playfield, REF_TICK_MS};
use aquarium::entity::Body;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sprites() -> SpriteBank {
    SpriteBank::load(&mut ClipCache::new(SheetManifest::default())).expect("built-in sheets")
}

/// A body whose clip set has no turn clip, so it never pauses to turn.
fn plain_body(x: f32, y: f32, speed: f32) -> Body {
    Body::new(x, y, 100.0, Arc::clone(&sprites().enemy), 8.0).with_speed(speed)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── ticks ─────────────────────────────────────────────────────────────────────

#[test]
fn ticks_scale_against_reference_frame() {
    assert_eq!(ticks(REF_TICK_MS), 1.0);
    assert_eq!(ticks(f32::NAN), 0.0);
    assert_eq!(ticks(f32::INFINITY), 0.0);
    assert!((ticks(2.0 * REF_TICK_MS) - 2.0).abs() < 1e-6);
}

// ── move_towards_target ───────────────────────────────────────────────────────

#[test]
fn one_reference_tick_moves_by_speed() {
    let mut body = plain_body(0.0, 0.0, 10.0);
    body.set_target(100.0, 0.0);
    body.move_towards_target(REF_TICK_MS);
    assert_eq!(body.x, 10.0);
    assert_eq!(body.y, 0.0);
}

#[test]
fn rounded_frame_time_moves_by_about_speed() {
    let mut body = plain_body(0.0, 0.0, 10.0);
    body.set_target(100.0, 0.0);
    body.move_towards_target(16.67);
    assert!((body.x - 10.0).abs() < 0.01);
    assert_eq!(body.y, 0.0);
}

#[test]
fn axes_move_independently() {
    let mut body = plain_body(0.0, 0.0, 10.0);
    body.set_target(100.0, -4.0);
    body.move_towards_target(REF_TICK_MS);
    assert_eq!(body.x, 10.0);
    assert_eq!(body.y, -4.0);
}

#[test]
fn snaps_onto_target_without_overshoot() {
    let mut body = plain_body(95.0, 0.0, 10.0);
    body.set_target(100.0, 0.0);
    body.move_towards_target(REF_TICK_MS);
    assert_eq!(body.x, 100.0);
    body.move_towards_target(REF_TICK_MS);
    assert_eq!(body.x, 100.0);
}

#[test]
fn no_target_or_bad_delta_holds_still() {
    let mut body = plain_body(50.0, 50.0, 10.0);
    body.move_towards_target(REF_TICK_MS);
    assert_eq!((body.x, body.y), (50.0, 50.0));

    body.set_target(0.0, 0.0);
    body.move_towards_target(f32::NAN);
    body.move_towards_target(-REF_TICK_MS);
    assert_eq!((body.x, body.y), (50.0, 50.0));
}

#[test]
fn holds_still_while_turning() {
    let bank = sprites();
    let mut body = Body::new(0.0, 100.0, 100.0, Arc::clone(&bank.fish), 8.0).with_speed(10.0);
    body.set_target(100.0, 100.0);
    assert!(body.is_turning());
    body.move_towards_target(REF_TICK_MS);
    assert_eq!(body.x, 0.0);
}

#[test]
fn holds_still_while_eating() {
    let bank = sprites();
    let mut body = Body::new(0.0, 100.0, 100.0, Arc::clone(&bank.fish), 8.0).with_speed(10.0);
    body.set_target(0.0, 0.0);
    body.begin_eating();
    assert!(body.is_eating());
    body.move_towards_target(REF_TICK_MS);
    assert_eq!(body.y, 100.0);
}

// ── set_target facing ─────────────────────────────────────────────────────────

#[test]
fn set_target_flips_facing_only_on_direction_change() {
    let bank = sprites();
    let mut body = Body::new(50.0, 100.0, 100.0, Arc::clone(&bank.fish), 8.0);
    assert!(!body.is_mirrored());

    body.set_target(10.0, 100.0);
    assert!(!body.is_mirrored());
    assert!(!body.is_turning());

    body.set_target(90.0, 100.0);
    assert!(body.is_mirrored());
    assert!(body.is_turning());

    // Same x keeps the current facing
    body.set_target(50.0, 0.0);
    assert!(body.is_mirrored());
}

#[test]
fn species_without_turn_clip_never_turns() {
    let mut body = plain_body(50.0, 100.0, 3.0);
    body.set_target(90.0, 100.0);
    assert!(body.is_mirrored());
    assert!(!body.is_turning());
}

// ── target_random_location ────────────────────────────────────────────────────

#[test]
fn random_target_lands_inside_swimming_area() {
    let pf = Playfield::default();
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let mut body = plain_body(200.0, 200.0, 3.0);
        body.target_random_location(false, &pf, &mut rng);
        let t = body.target().unwrap();
        assert!(t.x >= 0.0 && t.x <= pf.width - body.width());
        assert!(t.y >= pf.hud_height);
        assert!(t.y <= pf.height - pf.floor_height - body.height());
    }
}

#[test]
fn horizontal_only_keeps_lane() {
    let bank = sprites();
    let pf = Playfield::default();
    let mut rng = seeded_rng();
    let mut body = Body::new(100.0, 360.0, 100.0, Arc::clone(&bank.friend), 8.0).with_speed(2.0);
    body.target_random_location(true, &pf, &mut rng);
    assert_eq!(body.target().unwrap().y, 360.0);
}

#[test]
fn keeps_distant_target() {
    let pf = Playfield::default();
    let mut rng = seeded_rng();
    let mut body = plain_body(0.0, 100.0, 3.0);
    body.set_target(400.0, 200.0);
    body.target_random_location(false, &pf, &mut rng);
    let t = body.target().unwrap();
    assert_eq!((t.x, t.y), (400.0, 200.0));
}

#[test]
fn replaces_target_once_arrived() {
    let pf = Playfield::default();
    let mut rng = seeded_rng();
    let mut body = plain_body(200.0, 200.0, 3.0);
    body.set_target(202.0, 201.0);
    body.target_random_location(false, &pf, &mut rng);
    let t = body.target().unwrap();
    assert_ne!((t.x, t.y), (202.0, 201.0));
}

// ── Properties ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn step_never_increases_distance_or_overshoots(
        x in -500f32..500.0,
        y in -500f32..500.0,
        tx in -500f32..500.0,
        ty in -500f32..500.0,
        speed in 0.1f32..20.0,
        delta in 0f32..100.0,
    ) {
        let mut body = plain_body(x, y, speed);
        body.set_target(tx, ty);
        let before = ((tx - body.x).abs(), (ty - body.y).abs());
        let signs = ((tx - body.x).signum(), (ty - body.y).signum());
        body.move_towards_target(delta);
        let after = ((tx - body.x).abs(), (ty - body.y).abs());

        prop_assert!(after.0 <= before.0);
        prop_assert!(after.1 <= before.1);
        prop_assert!(body.x == tx || (tx - body.x).signum() == signs.0);
        prop_assert!(body.y == ty || (ty - body.y).signum() == signs.1);
    }
}
