//! Collision detection and the per-frame resolution pass.

use crate::entities::{Category, Entity, EntityKind, HitOutcome};
use crate::state::GameState;
use crate::world::EntityKey;

/// Share of the shorter side trimmed from each edge of a sprite's box.
pub const HITBOX_MARGIN_RATIO: f32 = 0.2;

/// Axis-aligned box given by its edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            right: x + width,
            top: y,
            bottom: y + height,
        }
    }

    /// Shrink inward by `0.2 * min(width, height)` on every side.
    pub fn shrunk(x: f32, y: f32, width: f32, height: f32) -> Self {
        let margin = width.min(height) * HITBOX_MARGIN_RATIO;
        Self {
            left: x + margin,
            right: x + width - margin,
            top: y + margin,
            bottom: y + height - margin,
        }
    }

    /// True when the box has no area (edges crossed or touching).
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Strict overlap: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// The box used for collisions.  Sprites get the margin-adjusted box; the
/// boss uses its full bounds.
pub fn bounds(entity: &Entity) -> Bounds {
    let (x, y, w, h) = (entity.pos.x, entity.pos.y, entity.size.x, entity.size.y);
    match entity.kind {
        EntityKind::Boss(_) => Bounds::from_rect(x, y, w, h),
        _ => Bounds::shrunk(x, y, w, h),
    }
}

pub fn collides(a: &Entity, b: &Entity) -> bool {
    bounds(a).intersects(&bounds(b))
}

// ── Resolution pass ──────────────────────────────────────────────────────────

/// Tally of what one resolution pass did, mostly for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub player_hits: u32,
    pub enemies_destroyed: u32,
    pub boss_hits: u32,
    pub boss_destroyed: bool,
}

fn bounds_of(state: &GameState, key: EntityKey) -> Option<Bounds> {
    state.world.get(key).map(bounds)
}

/// Resolve every category pairing for this frame.
///
/// Categories are captured once, up front, so an entity deactivated by an
/// earlier rule still takes part in later rules.  In particular a player
/// bullet spent on an enemy can still hit the boss in the same frame.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();

    let Some(player_key) = state.player_key() else {
        return report;
    };
    if state.is_player_invulnerable() {
        return report;
    }
    let Some(player_box) = bounds_of(state, player_key) else {
        return report;
    };

    let player_bullets = state.world.keys_of(Category::PlayerBullet);
    let enemy_bullets = state.world.keys_of(Category::EnemyBullet);
    let enemies = state.world.keys_of(Category::Enemy);
    let bosses = state.world.keys_of(Category::Boss);

    // 1. Enemy bullets against the player
    for &key in &enemy_bullets {
        if bounds_of(state, key).is_some_and(|b| b.intersects(&player_box)) {
            deactivate(state, key);
            hit_player(state, &mut report);
        }
    }

    // 2. Enemies rammed into the player
    for &key in &enemies {
        if bounds_of(state, key).is_some_and(|b| b.intersects(&player_box)) {
            deactivate(state, key);
            hit_player(state, &mut report);
        }
    }

    // 3. Boss body; the boss itself is unharmed
    for &key in &bosses {
        if bounds_of(state, key).is_some_and(|b| b.intersects(&player_box)) {
            hit_player(state, &mut report);
        }
    }

    // 4. Player bullets against enemies, first match only
    for &bullet in &player_bullets {
        let Some(bullet_box) = bounds_of(state, bullet) else {
            continue;
        };
        for &enemy in &enemies {
            if !is_active(state, enemy) {
                continue;
            }
            if bounds_of(state, enemy).is_some_and(|b| bullet_box.intersects(&b)) {
                deactivate(state, bullet);
                hit_target(state, enemy, &mut report);
                break;
            }
        }
    }

    // 5. Player bullets against the boss
    for &bullet in &player_bullets {
        let Some(bullet_box) = bounds_of(state, bullet) else {
            continue;
        };
        for &boss in &bosses {
            if !is_active(state, boss) {
                continue;
            }
            if bounds_of(state, boss).is_some_and(|b| bullet_box.intersects(&b)) {
                deactivate(state, bullet);
                hit_target(state, boss, &mut report);
                break;
            }
        }
    }

    if report != CollisionReport::default() {
        log::trace!("collisions: {:?}", report);
    }
    report
}

fn is_active(state: &GameState, key: EntityKey) -> bool {
    state.world.get(key).is_some_and(Entity::is_active)
}

fn deactivate(state: &mut GameState, key: EntityKey) {
    if let Some(entity) = state.world.get_mut(key) {
        entity.deactivate();
    }
}

fn hit_player(state: &mut GameState, report: &mut CollisionReport) {
    if state.hit_player() != crate::player::PlayerHit::Ignored {
        report.player_hits += 1;
    }
}

/// Hit an enemy or the boss and apply the outcome to the run.
fn hit_target(state: &mut GameState, key: EntityKey, report: &mut CollisionReport) {
    let Some(target) = state.world.get_mut(key) else {
        return;
    };
    let category = target.category();
    match target.hit() {
        HitOutcome::Ignored => {}
        HitOutcome::Damaged { hp_left } => {
            report.boss_hits += 1;
            state.boss_hp = hp_left;
        }
        HitOutcome::Destroyed { score, explosion } => {
            state.add_score(score);
            state.spawn(explosion);
            if category == Category::Boss {
                report.boss_hits += 1;
                report.boss_destroyed = true;
                state.on_boss_destroyed();
            } else {
                report.enemies_destroyed += 1;
                log::debug!("enemy destroyed, score {}", state.score);
            }
        }
    }
}
