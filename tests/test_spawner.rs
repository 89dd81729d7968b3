use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use side_shooter::config::GameConfig;
use side_shooter::entities::{Category, Entity};
use side_shooter::spawner::*;
use side_shooter::{GameState, Phase};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_state() -> GameState {
    let mut s = GameState::new(&GameConfig::default());
    s.begin_run();
    s
}

#[test]
fn interval_shrinks_by_stage() {
    assert_eq!(spawn_interval_ms(1), 1500.0);
    assert_eq!(spawn_interval_ms(2), 1200.0);
    assert_eq!(spawn_interval_ms(3), 900.0);
}

#[test]
fn due_spawn_fires_even_on_a_zero_delta() {
    let mut s = make_state();
    s.spawn_timer_ms = 1500.0;
    let event = advance(&mut s, 0.0, &mut seeded_rng());
    assert_eq!(event, SpawnEvent::EnemySpawned);
    assert_eq!(s.spawn_timer_ms, 0.0);

    let enemies: Vec<&Entity> = s
        .world
        .active()
        .filter(|e| e.category() == Category::Enemy)
        .collect();
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].pos.x, 800.0);
    assert!(enemies[0].pos.y >= 0.0 && enemies[0].pos.y < 500.0);
}

#[test]
fn spawn_timer_accumulates_until_interval() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..14 {
        assert_eq!(advance(&mut s, 100.0, &mut rng), SpawnEvent::None);
    }
    assert_eq!(advance(&mut s, 100.0, &mut rng), SpawnEvent::EnemySpawned);
    assert_eq!(s.world.count_of(Category::Enemy), 1);
    assert_eq!(s.stage_timer_ms, 1500.0);
}

#[test]
fn later_stages_spawn_faster() {
    let mut s = make_state();
    s.stage = 3;
    let mut rng = seeded_rng();
    let mut spawned = 0;
    for _ in 0..30 {
        if advance(&mut s, 100.0, &mut rng) == SpawnEvent::EnemySpawned {
            spawned += 1;
        }
    }
    // 3000 ms at a 900 ms interval
    assert_eq!(spawned, 3);
}

#[test]
fn enemy_heights_stay_on_canvas() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..200 {
        spawn_enemy(&mut s, &mut rng);
    }
    for enemy in s.world.active().filter(|e| e.category() == Category::Enemy) {
        assert!(enemy.pos.y >= 0.0);
        assert!(enemy.pos.y + enemy.size.y <= 600.0);
    }
}

#[test]
fn short_canvas_spawns_at_the_top() {
    let mut config = GameConfig::default();
    config.canvas.height = 80.0;
    let mut s = GameState::new(&config);
    s.begin_run();
    spawn_enemy(&mut s, &mut seeded_rng());
    let enemy = s
        .world
        .active()
        .find(|e| e.category() == Category::Enemy)
        .unwrap();
    assert_eq!(enemy.pos.y, 0.0);
}

#[test]
fn boss_arrives_when_stage_timer_expires() {
    let mut s = make_state();
    s.stage_timer_ms = 29_990.0;
    s.spawn(Entity::enemy(Vec2::new(400.0, 100.0), 1));
    s.spawn(Entity::enemy(Vec2::new(500.0, 200.0), 1));

    let event = advance(&mut s, 10.0, &mut seeded_rng());

    assert_eq!(event, SpawnEvent::BossArrived);
    assert_eq!(s.phase, Phase::Boss);
    assert_eq!(s.world.count_of(Category::Enemy), 0);
    assert_eq!(s.world.count_of(Category::Boss), 1);
    assert!(s.boss_key().is_some());
    assert_eq!(s.boss_hp, 15);
    assert_eq!(s.max_boss_hp, 15);
    // The player survives the sweep.
    assert!(s.player().is_some());
}

#[test]
fn boss_hp_scales_with_stage() {
    let mut s = make_state();
    s.stage = 2;
    s.stage_timer_ms = BOSS_ARRIVAL_MS;
    advance(&mut s, 0.0, &mut seeded_rng());
    assert_eq!(s.boss_hp, 30);
}

#[test]
fn nothing_spawns_once_the_boss_is_out() {
    let mut s = make_state();
    s.phase = Phase::Boss;
    s.spawn_timer_ms = 5000.0;
    assert_eq!(advance(&mut s, 100.0, &mut seeded_rng()), SpawnEvent::None);
    assert_eq!(s.world.count_of(Category::Enemy), 0);
    assert_eq!(s.spawn_timer_ms, 5000.0);
}

#[test]
fn timers_do_not_run_outside_play() {
    let mut s = GameState::new(&GameConfig::default());
    assert_eq!(s.phase, Phase::Title);
    assert_eq!(advance(&mut s, 40_000.0, &mut seeded_rng()), SpawnEvent::None);
    assert_eq!(s.stage_timer_ms, 0.0);
    assert!(s.world.is_empty());
}
