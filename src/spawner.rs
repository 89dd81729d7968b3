//! Stage timer and enemy spawn cadence.

use glam::Vec2;
use rand::Rng;

use crate::entities::{Entity, ENEMY_SIZE};
use crate::phase::Phase;
use crate::state::GameState;

/// Time in `Playing` before the boss shows up.
pub const BOSS_ARRIVAL_MS: f32 = 30_000.0;

const BASE_SPAWN_INTERVAL_MS: f32 = 1500.0;
const SPAWN_INTERVAL_STEP_MS: f32 = 300.0;

/// Enemies spawn faster on later stages.
pub fn spawn_interval_ms(stage: u32) -> f32 {
    BASE_SPAWN_INTERVAL_MS - stage.saturating_sub(1) as f32 * SPAWN_INTERVAL_STEP_MS
}

/// What the spawner did this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnEvent {
    None,
    EnemySpawned,
    BossArrived,
}

/// Advance the stage and spawn timers.  Does nothing outside `Playing`; once
/// the boss is out, it alone produces new hostile entities.
pub fn advance<R: Rng + ?Sized>(state: &mut GameState, delta_ms: f32, rng: &mut R) -> SpawnEvent {
    if state.phase != Phase::Playing {
        return SpawnEvent::None;
    }
    let dt = delta_ms.max(0.0);
    state.stage_timer_ms += dt;

    if state.stage_timer_ms >= BOSS_ARRIVAL_MS {
        state.enter_boss_phase();
        return SpawnEvent::BossArrived;
    }

    state.spawn_timer_ms += dt;
    if state.spawn_timer_ms >= spawn_interval_ms(state.stage) {
        spawn_enemy(state, rng);
        state.spawn_timer_ms = 0.0;
        return SpawnEvent::EnemySpawned;
    }
    SpawnEvent::None
}

/// One enemy at the right edge, at a random height in `[0, height - 100)`.
pub fn spawn_enemy<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let max_y = state.canvas.height - ENEMY_SIZE.y;
    let y = if max_y > 0.0 {
        rng.gen_range(0.0..max_y)
    } else {
        0.0
    };
    let enemy = Entity::enemy(Vec2::new(state.canvas.width, y), state.stage);
    state.spawn(enemy);
    log::debug!("enemy spawned at y={:.0} (stage {})", y, state.stage);
}
