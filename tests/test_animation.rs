use std::sync::Arc;

use aquarium::animation::*;

use proptest::prelude::*;

fn clip(mode: PlaybackMode) -> Clip {
    Clip {
        name: "test".to_string(),
        rows: 3,
        columns: 4,
        mode,
        frame_width: 10.0,
        frame_height: 10.0,
    }
}

// 4 fps and 250 ms per draw: exactly one frame per advance.
const FPS: f32 = 4.0;
const STEP: f32 = 250.0;

// ── Clip ──────────────────────────────────────────────────────────────────────

#[test]
fn row_base_clamps_to_last_row() {
    let c = clip(PlaybackMode::Loop);
    assert_eq!(c.frame_count(), 12);
    assert_eq!(c.row_base(0), 0);
    assert_eq!(c.row_base(2), 8);
    assert_eq!(c.row_base(7), 8);
}

#[test]
fn clip_set_falls_back_to_swim() {
    let swim = Arc::new(clip(PlaybackMode::Loop));
    let turn = Arc::new(Clip {
        name: "turn".to_string(),
        ..clip(PlaybackMode::Once)
    });
    let set = ClipSet::new(swim).with(ClipRole::Turn, turn);

    assert!(set.has(ClipRole::Turn));
    assert!(!set.has(ClipRole::Eat));
    assert_eq!(set.effective(ClipRole::Eat), ClipRole::Swim);
    assert_eq!(set.effective(ClipRole::Turn), ClipRole::Turn);
    assert_eq!(set.clip(ClipRole::Die).name, "test");
    assert_eq!(set.clip(ClipRole::Turn).name, "turn");
}

// ── Loop playback ─────────────────────────────────────────────────────────────

#[test]
fn loop_wraps_to_row_base() {
    let c = clip(PlaybackMode::Loop);
    let mut anim = Animation::new(1, FPS);
    anim.select(ClipRole::Swim, &c);
    assert_eq!(anim.frame(), 4);

    for expected in [5, 6, 7, 4, 5] {
        assert_eq!(anim.advance(STEP, &c), Advance::Running);
        assert_eq!(anim.frame(), expected);
    }
}

// ── Once playback ─────────────────────────────────────────────────────────────

#[test]
fn once_completes_exactly_once_then_holds() {
    let c = clip(PlaybackMode::Once);
    let mut anim = Animation::new(0, FPS);
    anim.select(ClipRole::Turn, &c);

    assert_eq!(anim.advance(STEP, &c), Advance::Running);
    assert_eq!(anim.advance(STEP, &c), Advance::Running);
    assert_eq!(anim.advance(STEP, &c), Advance::Running);
    assert_eq!(anim.advance(STEP, &c), Advance::Completed);
    assert_eq!(anim.frame(), 3);
    assert!(anim.is_finished());

    for _ in 0..5 {
        anim.select(ClipRole::Turn, &c);
        assert_eq!(anim.advance(STEP, &c), Advance::Held);
        assert_eq!(anim.frame(), 3);
    }
}

#[test]
fn rewind_replays_same_role() {
    let c = clip(PlaybackMode::Once);
    let mut anim = Animation::new(2, FPS);
    anim.select(ClipRole::Eat, &c);
    anim.advance(STEP * 10.0, &c);
    assert!(anim.is_finished());

    anim.rewind();
    anim.select(ClipRole::Eat, &c);
    assert!(!anim.is_finished());
    assert_eq!(anim.frame(), 8);
}

#[test]
fn role_change_restarts_at_row_base() {
    let c = clip(PlaybackMode::Loop);
    let mut anim = Animation::new(1, FPS);
    anim.select(ClipRole::Swim, &c);
    anim.advance(STEP, &c);
    anim.advance(STEP, &c);
    assert_eq!(anim.frame(), 6);

    anim.select(ClipRole::Hungry, &c);
    assert_eq!(anim.frame(), 4);
    assert_eq!(anim.role(), Some(ClipRole::Hungry));
}

// ── Bad deltas ────────────────────────────────────────────────────────────────

#[test]
fn non_finite_or_negative_delta_is_ignored() {
    let c = clip(PlaybackMode::Once);
    let mut anim = Animation::new(1, FPS);
    anim.select(ClipRole::Swim, &c);
    anim.advance(STEP, &c);
    let before = anim.current_frame();

    for delta in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -500.0] {
        assert_eq!(anim.advance(delta, &c), Advance::Running);
        assert_eq!(anim.current_frame(), before);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn frame_stays_within_selected_row(
        row in 0usize..5,
        once in any::<bool>(),
        deltas in prop::collection::vec(0f32..2000.0, 1..60),
    ) {
        let mode = if once { PlaybackMode::Once } else { PlaybackMode::Loop };
        let c = clip(mode);
        let base = c.row_base(row);
        let mut anim = Animation::new(row, 8.0);
        let mut completions = 0;
        for delta in deltas {
            anim.select(ClipRole::Swim, &c);
            prop_assert!(anim.frame() >= base && anim.frame() < base + c.columns);
            if anim.advance(delta, &c) == Advance::Completed {
                completions += 1;
            }
            prop_assert!(anim.frame() >= base && anim.frame() < base + c.columns);
        }
        prop_assert!(completions <= 1);
        if !once {
            prop_assert_eq!(completions, 0);
        }
    }
}
