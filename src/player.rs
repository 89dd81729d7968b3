//! Player controller: movement, shooting, invulnerability and hit reaction.

use glam::Vec2;

use crate::entities::{Entity, EntityKind, UpdateContext};
use crate::input::Key;

/// Pointer-follow stops inside this distance so the ship does not jitter.
pub const POINTER_DEADZONE: f32 = 5.0;
pub const INVULNERABLE_MS: f32 = 3000.0;
pub const BLINK_PERIOD_MS: f32 = 100.0;

/// What a hit did to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerHit {
    /// Invulnerable (or already out of lives): nothing happened
    Ignored,
    LifeLost { lives_left: u32 },
    OutOfLives,
}

pub(crate) fn update(entity: &mut Entity, ctx: &UpdateContext<'_>, spawned: &mut Vec<Entity>) {
    let dt = ctx.delta_ms.max(0.0);

    tick_invulnerability(entity, dt);
    steer(entity, ctx, dt);
    clamp_to_canvas(entity, ctx);

    if ctx.input.wants_fire(ctx.now_ms, ctx.gameplay.fire_hold_ms) {
        try_shoot(entity, ctx.now_ms, spawned);
    }
}

fn tick_invulnerability(entity: &mut Entity, dt: f32) {
    let EntityKind::Player(p) = &mut entity.kind else {
        return;
    };
    if !p.invulnerable {
        return;
    }
    p.invulnerable_ms -= dt;
    p.blink_ms += dt;
    if p.blink_ms > BLINK_PERIOD_MS {
        entity.visible = !entity.visible;
        p.blink_ms = 0.0;
    }
    if p.invulnerable_ms <= 0.0 {
        p.invulnerable = false;
        p.invulnerable_ms = 0.0;
        entity.visible = true;
    }
}

fn steer(entity: &mut Entity, ctx: &UpdateContext<'_>, dt: f32) {
    let Some(speed) = entity.as_player().map(|p| p.speed) else {
        return;
    };
    let step = speed * dt / 1000.0;

    if let Some(target) = ctx.input.pointer_position() {
        let delta = target - entity.center();
        let distance = delta.length();
        if distance > POINTER_DEADZONE {
            entity.pos += delta / distance * step;
        }
        return;
    }

    let input = ctx.input;
    let mut dir = Vec2::ZERO;
    if input.is_key_pressed(Key::Left) {
        dir.x -= 1.0;
    }
    if input.is_key_pressed(Key::Right) {
        dir.x += 1.0;
    }
    if input.is_key_pressed(Key::Up) {
        dir.y -= 1.0;
    }
    if input.is_key_pressed(Key::Down) {
        dir.y += 1.0;
    }
    // Axis-aligned: diagonals are not normalized.
    entity.pos += dir * step;
}

fn clamp_to_canvas(entity: &mut Entity, ctx: &UpdateContext<'_>) {
    let max = Vec2::new(
        (ctx.canvas.width - entity.size.x).max(0.0),
        (ctx.canvas.height - entity.size.y).max(0.0),
    );
    entity.pos = entity.pos.clamp(Vec2::ZERO, max);
}

/// Fire a bullet from the right-center edge if the cooldown has elapsed.
/// Returns whether a shot was fired.
pub fn try_shoot(entity: &mut Entity, now_ms: f64, spawned: &mut Vec<Entity>) -> bool {
    let muzzle = Vec2::new(entity.pos.x + entity.size.x, entity.pos.y + entity.size.y / 2.0);
    let EntityKind::Player(p) = &mut entity.kind else {
        return false;
    };
    if let Some(last) = p.last_shot_ms {
        if now_ms - last < p.shot_cooldown_ms {
            return false;
        }
    }
    spawned.push(Entity::player_bullet(muzzle));
    p.last_shot_ms = Some(now_ms);
    true
}

/// Apply a hit to the player, decrementing `lives`.
///
/// The player is not moved; a surviving player becomes invulnerable where it
/// was hit.
pub fn take_hit(entity: &mut Entity, lives: &mut u32) -> PlayerHit {
    let EntityKind::Player(p) = &mut entity.kind else {
        return PlayerHit::Ignored;
    };
    if p.invulnerable || *lives == 0 {
        return PlayerHit::Ignored;
    }
    *lives -= 1;
    if *lives == 0 {
        return PlayerHit::OutOfLives;
    }
    p.invulnerable = true;
    p.invulnerable_ms = INVULNERABLE_MS;
    p.blink_ms = 0.0;
    PlayerHit::LifeLost { lives_left: *lives }
}

pub fn is_invulnerable(entity: &Entity) -> bool {
    entity.as_player().is_some_and(|p| p.invulnerable)
}
