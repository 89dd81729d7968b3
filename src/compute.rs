//! Simulation step.
//!
//! One call advances the run by `delta_ms`: background scroll, stage and
//! spawn timers, every active entity, then removal of inactive entities.
//! All randomness comes through `rng` so callers control determinism (tests
//! use a seeded RNG).

use rand::Rng;

use crate::entities::UpdateContext;
use crate::input::InputSnapshot;
use crate::spawner::{self, SpawnEvent};
use crate::state::GameState;

/// Background scroll speed (units per second).
pub const SCROLL_SPEED: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub spawn: SpawnEvent,
    /// Entities created by updates this step (bullets)
    pub spawned: usize,
    /// Inactive entities removed at the end of the step
    pub culled: usize,
}

/// Advance every active entity.  Outside `Playing`/`Boss` this is a no-op.
pub fn step<R: Rng + ?Sized>(
    state: &mut GameState,
    input: &InputSnapshot,
    delta_ms: f32,
    now_ms: f64,
    rng: &mut R,
) -> StepReport {
    let mut report = StepReport {
        spawn: SpawnEvent::None,
        spawned: 0,
        culled: 0,
    };
    if !state.phase.is_active_play() {
        return report;
    }
    let dt = delta_ms.max(0.0);

    scroll_background(state, dt);
    report.spawn = spawner::advance(state, dt, rng);

    // Stage clear or game over may not happen mid-update, only in the
    // resolution pass, so the phase checked above still holds here.
    let keys = state.world.keys().to_vec();
    let mut spawned = Vec::new();
    {
        let ctx = UpdateContext {
            delta_ms: dt,
            now_ms,
            canvas: state.canvas,
            stage: state.stage,
            input,
            gameplay: &state.gameplay,
        };
        for key in keys {
            if let Some(entity) = state.world.get_mut(key) {
                entity.update(&ctx, rng, &mut spawned);
            }
        }
    }

    report.spawned = spawned.len();
    for entity in spawned {
        state.spawn(entity);
    }

    if let Some(hp) = state.boss().and_then(|b| b.as_boss()).map(|b| b.hp) {
        state.boss_hp = hp;
    }

    report.culled = state.cull();
    log::trace!("step dt={:.1}ms entities={} {:?}", dt, state.world.len(), report);
    report
}

fn scroll_background(state: &mut GameState, dt: f32) {
    state.scroll_offset += SCROLL_SPEED * dt / 1000.0;
    if state.scroll_offset >= state.canvas.width {
        state.scroll_offset = 0.0;
    }
}
