use approx::assert_relative_eq;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use side_shooter::compute::*;
use side_shooter::config::GameConfig;
use side_shooter::entities::{Category, Entity};
use side_shooter::spawner::SpawnEvent;
use side_shooter::{FrameScheduler, GameState, InputSnapshot, Key, Phase};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_state() -> GameState {
    let mut s = GameState::new(&GameConfig::default());
    s.begin_run();
    s
}

// ── step ──────────────────────────────────────────────────────────────────────

#[test]
fn step_is_a_no_op_outside_play() {
    let mut s = GameState::new(&GameConfig::default());
    let report = step(&mut s, &InputSnapshot::new(), 1000.0, 0.0, &mut seeded_rng());
    assert_eq!(report.spawn, SpawnEvent::None);
    assert_eq!(s.scroll_offset, 0.0);
    assert_eq!(s.stage_timer_ms, 0.0);
}

#[test]
fn step_culls_bullets_that_leave_the_canvas() {
    let mut s = make_state();
    s.spawn(Entity::player_bullet(Vec2::new(799.0, 100.0)));
    let report = step(&mut s, &InputSnapshot::new(), 100.0, 0.0, &mut seeded_rng());
    assert_eq!(report.culled, 1);
    assert_eq!(s.world.count_of(Category::PlayerBullet), 0);
    assert_eq!(s.world.len(), 1);
}

#[test]
fn background_scrolls_and_wraps() {
    let mut s = make_state();
    let input = InputSnapshot::new();
    step(&mut s, &input, 1000.0, 0.0, &mut seeded_rng());
    assert_relative_eq!(s.scroll_offset, 50.0);

    s.scroll_offset = 790.0;
    step(&mut s, &input, 1000.0, 1000.0, &mut seeded_rng());
    assert_eq!(s.scroll_offset, 0.0);
}

#[test]
fn bullets_fired_during_step_join_the_world() {
    let mut s = make_state();
    let mut input = InputSnapshot::new();
    input.set_key(Key::Shoot, true);
    let report = step(&mut s, &input, 16.0, 1000.0, &mut seeded_rng());
    assert_eq!(report.spawned, 1);
    assert_eq!(s.world.count_of(Category::PlayerBullet), 1);
}

#[test]
fn newly_spawned_bullet_waits_a_frame_to_move() {
    let mut s = make_state();
    let mut input = InputSnapshot::new();
    input.set_key(Key::Shoot, true);
    step(&mut s, &input, 100.0, 1000.0, &mut seeded_rng());
    let bullet = s
        .world
        .active()
        .find(|e| e.category() == Category::PlayerBullet)
        .unwrap();
    // Muzzle of the player after it stood still for the frame.
    assert_eq!(bullet.pos, Vec2::new(150.0, 350.0));
}

#[test]
fn boss_hp_mirror_follows_the_boss() {
    let mut s = make_state();
    s.phase = Phase::Boss;
    let boss = s.spawn(Entity::boss(1, s.canvas));
    s.world.get_mut(boss).unwrap().hit();
    step(&mut s, &InputSnapshot::new(), 16.0, 0.0, &mut seeded_rng());
    assert_eq!(s.boss_hp, 14);
    assert_eq!(s.max_boss_hp, 15);
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let mut s = make_state();
        let mut rng = seeded_rng();
        let input = InputSnapshot::new();
        for i in 0..100 {
            step(&mut s, &input, 50.0, i as f64 * 50.0, &mut rng);
        }
        s.world
            .active()
            .filter(|e| e.category() == Category::Enemy)
            .map(|e| e.pos)
            .collect::<Vec<_>>()
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

// ── FrameScheduler ────────────────────────────────────────────────────────────

#[test]
fn first_frame_has_zero_delta() {
    let mut sched = FrameScheduler::new();
    assert_eq!(sched.delta_ms(12_345.0), 0.0);
    assert_eq!(sched.delta_ms(12_361.0), 16.0);
}

#[test]
fn backwards_timestamps_clamp_to_zero() {
    let mut sched = FrameScheduler::new();
    sched.delta_ms(1000.0);
    assert_eq!(sched.delta_ms(900.0), 0.0);
    assert_eq!(sched.delta_ms(950.0), 50.0);
}

#[test]
fn title_frames_do_not_simulate() {
    let mut s = GameState::new(&GameConfig::default());
    let mut sched = FrameScheduler::new();
    let input = InputSnapshot::new();
    sched.frame(&mut s, &input, 0.0, &mut seeded_rng());
    let report = sched.frame(&mut s, &input, 500.0, &mut seeded_rng());
    assert_eq!(report.delta_ms, 500.0);
    assert!(report.step.is_none());
    assert!(report.collisions.is_none());
    assert_eq!(sched.simulated_frames(), 0);
}

#[test]
fn boss_arrives_after_thirty_seconds_of_frames() {
    let mut s = make_state();
    // No player, so nothing interrupts the stage.
    s.world.clear();
    let mut sched = FrameScheduler::new();
    let mut rng = seeded_rng();
    let input = InputSnapshot::new();

    for i in 0..300 {
        sched.frame(&mut s, &input, i as f64 * 100.0, &mut rng);
        assert_eq!(s.phase, Phase::Playing, "frame {}", i);
    }
    let report = sched.frame(&mut s, &input, 30_000.0, &mut rng);
    assert_eq!(report.step.map(|r| r.spawn), Some(SpawnEvent::BossArrived));
    assert_eq!(s.phase, Phase::Boss);
    assert_eq!(s.world.count_of(Category::Enemy), 0);
    assert_eq!(s.world.count_of(Category::Boss), 1);
}

#[test]
fn losing_last_life_ends_the_game_on_the_same_frame() {
    let mut s = make_state();
    s.lives = 1;
    s.spawn(Entity::enemy_bullet(Vec2::new(0.0, 250.0), 1));
    let mut sched = FrameScheduler::new();
    let input = InputSnapshot::new();

    let report = sched.frame(&mut s, &input, 0.0, &mut seeded_rng());
    assert_eq!(report.collisions.map(|c| c.player_hits), Some(1));
    assert_eq!(s.phase, Phase::GameOver);
    assert_eq!(s.lives, 0);

    let next = sched.frame(&mut s, &input, 16.0, &mut seeded_rng());
    assert!(next.step.is_none());
}

#[test]
fn stage_clear_stops_the_simulation() {
    let mut s = make_state();
    s.phase = Phase::Boss;
    let boss = s.spawn(Entity::boss(1, s.canvas));
    for _ in 0..14 {
        s.world.get_mut(boss).unwrap().hit();
    }
    // Sits inside the boss after a zero-delta first frame.
    s.spawn(Entity::player_bullet(Vec2::new(500.0, 300.0)));
    let mut sched = FrameScheduler::new();
    let input = InputSnapshot::new();

    let report = sched.frame(&mut s, &input, 0.0, &mut seeded_rng());
    assert_eq!(report.collisions.map(|c| c.boss_destroyed), Some(true));
    assert_eq!(s.phase, Phase::StageClear);

    let timer = s.stage_timer_ms;
    let next = sched.frame(&mut s, &input, 1000.0, &mut seeded_rng());
    assert!(next.step.is_none());
    assert_eq!(s.stage_timer_ms, timer);
}

#[test]
fn pause_skips_frames_and_resume_restarts_the_clock() {
    let mut s = make_state();
    let mut sched = FrameScheduler::new();
    let input = InputSnapshot::new();
    let mut rng = seeded_rng();

    sched.frame(&mut s, &input, 0.0, &mut rng);
    sched.frame(&mut s, &input, 100.0, &mut rng);
    let timer = s.stage_timer_ms;
    assert_eq!(timer, 100.0);

    sched.toggle_pause();
    assert!(sched.is_paused());
    let paused = sched.frame(&mut s, &input, 5000.0, &mut rng);
    assert!(paused.step.is_none());
    assert_eq!(s.stage_timer_ms, timer);

    sched.resume();
    assert!(!sched.is_paused());
    let first = sched.frame(&mut s, &input, 9000.0, &mut rng);
    assert_eq!(first.delta_ms, 0.0);
    let second = sched.frame(&mut s, &input, 9100.0, &mut rng);
    assert_eq!(second.delta_ms, 100.0);
    assert_eq!(s.stage_timer_ms, 200.0);
    assert_eq!(sched.simulated_frames(), 4);
}
