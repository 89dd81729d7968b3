//! Entity model: every simulated object is an `Entity` carrying a
//! per-variant `EntityKind` payload.
//!
//! Variant behaviour (movement, timers, hit reactions) lives here too, except
//! for the player, whose controller reads input and sits in `player.rs`.

use glam::Vec2;
use rand::Rng;

use crate::config::{Canvas, GameplayConfig};
use crate::input::InputSnapshot;

// ── Variant constants ────────────────────────────────────────────────────────

pub const PLAYER_SIZE: Vec2 = Vec2::new(100.0, 100.0);
pub const PLAYER_START: Vec2 = Vec2::new(50.0, 300.0);

pub const PLAYER_BULLET_SIZE: Vec2 = Vec2::new(40.0, 20.0);
pub const PLAYER_BULLET_SPEED: f32 = 400.0;

/// Enemy bullets are drawn large so they are hard to slip past.
pub const ENEMY_BULLET_SIZE: Vec2 = Vec2::new(300.0, 300.0);

pub const ENEMY_SIZE: Vec2 = Vec2::new(100.0, 100.0);

pub const EXPLOSION_LIFETIME_MS: f32 = 500.0;
const EXPLOSION_SMALL: f32 = 80.0;
const EXPLOSION_LARGE: f32 = 160.0;

const BOSS_SHAKE_AMOUNT: f32 = 5.0;

pub const ENEMY_KILL_SCORE: u64 = 100;
pub const BOSS_KILL_SCORE: u64 = 5000;

fn enemy_speed(stage: u32) -> f32 {
    100.0 + stage.saturating_sub(1) as f32 * 50.0
}

fn enemy_bullet_speed(stage: u32) -> f32 {
    150.0 + stage.saturating_sub(1) as f32 * 50.0
}

pub fn boss_hp_for(stage: u32) -> u32 {
    15 * stage
}

pub fn boss_shot_cooldown_ms(stage: u32) -> f64 {
    1500.0 - stage.saturating_sub(1) as f64 * 200.0
}

// ── Variant payloads ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Units per second
    pub speed: f32,
    pub invulnerable: bool,
    /// Remaining invulnerability (ms); only meaningful while `invulnerable`
    pub invulnerable_ms: f32,
    /// Time since the last visibility toggle (ms)
    pub blink_ms: f32,
    /// Absolute timestamp of the last shot, `None` before the first one
    pub last_shot_ms: Option<f64>,
    pub shot_cooldown_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossState {
    pub stage: u32,
    pub hp: u32,
    pub max_hp: u32,
    /// Resting position; the shake offset is applied on top of it
    pub base: Vec2,
    pub shake_ms: f32,
    pub last_shot_ms: Option<f64>,
    pub shot_cooldown_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Player(PlayerState),
    PlayerBullet { speed: f32 },
    EnemyBullet { speed: f32 },
    Enemy { stage: u32, speed: f32 },
    Boss(BossState),
    Explosion { timer_ms: f32, large: bool },
}

/// Discriminator used when the resolution pass groups entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Player,
    PlayerBullet,
    EnemyBullet,
    Enemy,
    Boss,
    Explosion,
}

// ── Entity ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Render-only; the player blinks while invulnerable
    pub visible: bool,
    pub kind: EntityKind,
    active: bool,
}

/// Everything a variant's `update` may read for one frame.
pub struct UpdateContext<'a> {
    pub delta_ms: f32,
    /// Frame timestamp, used for the absolute shot cooldowns
    pub now_ms: f64,
    pub canvas: Canvas,
    pub stage: u32,
    pub input: &'a InputSnapshot,
    pub gameplay: &'a GameplayConfig,
}

/// Result of hitting an enemy or the boss.
#[derive(Clone, Debug, PartialEq)]
pub enum HitOutcome {
    /// Target was already gone or cannot be damaged
    Ignored,
    /// Boss lost one hit point and is still alive
    Damaged { hp_left: u32 },
    Destroyed { score: u64, explosion: Entity },
}

impl Entity {
    fn new(pos: Vec2, size: Vec2, kind: EntityKind) -> Self {
        Self {
            pos,
            size,
            visible: true,
            kind,
            active: true,
        }
    }

    pub fn player(gameplay: &GameplayConfig) -> Self {
        Self::new(
            PLAYER_START,
            PLAYER_SIZE,
            EntityKind::Player(PlayerState {
                speed: gameplay.player_speed,
                invulnerable: false,
                invulnerable_ms: 0.0,
                blink_ms: 0.0,
                last_shot_ms: None,
                shot_cooldown_ms: gameplay.shot_cooldown_ms,
            }),
        )
    }

    pub fn player_bullet(pos: Vec2) -> Self {
        Self::new(
            pos,
            PLAYER_BULLET_SIZE,
            EntityKind::PlayerBullet {
                speed: PLAYER_BULLET_SPEED,
            },
        )
    }

    pub fn enemy_bullet(pos: Vec2, stage: u32) -> Self {
        Self::new(
            pos,
            ENEMY_BULLET_SIZE,
            EntityKind::EnemyBullet {
                speed: enemy_bullet_speed(stage),
            },
        )
    }

    pub fn enemy(pos: Vec2, stage: u32) -> Self {
        Self::new(
            pos,
            ENEMY_SIZE,
            EntityKind::Enemy {
                stage,
                speed: enemy_speed(stage),
            },
        )
    }

    /// The boss is a square sized to the canvas, parked at the bottom right
    /// with two fifths of it off-screen.
    pub fn boss(stage: u32, canvas: Canvas) -> Self {
        let side = (canvas.width * 0.8).min(canvas.height * 1.6);
        let base = Vec2::new(canvas.width - side * 3.0 / 5.0, canvas.height - side);
        let hp = boss_hp_for(stage);
        Self::new(
            base,
            Vec2::splat(side),
            EntityKind::Boss(BossState {
                stage,
                hp,
                max_hp: hp,
                base,
                shake_ms: 0.0,
                last_shot_ms: None,
                shot_cooldown_ms: boss_shot_cooldown_ms(stage),
            }),
        )
    }

    /// Explosion centered on `center`.
    pub fn explosion(center: Vec2, large: bool) -> Self {
        let side = if large { EXPLOSION_LARGE } else { EXPLOSION_SMALL };
        Self::new(
            center - Vec2::splat(side / 2.0),
            Vec2::splat(side),
            EntityKind::Explosion {
                timer_ms: EXPLOSION_LIFETIME_MS,
                large,
            },
        )
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// One-way: nothing re-activates an entity.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn category(&self) -> Category {
        match self.kind {
            EntityKind::Player(_) => Category::Player,
            EntityKind::PlayerBullet { .. } => Category::PlayerBullet,
            EntityKind::EnemyBullet { .. } => Category::EnemyBullet,
            EntityKind::Enemy { .. } => Category::Enemy,
            EntityKind::Boss(_) => Category::Boss,
            EntityKind::Explosion { .. } => Category::Explosion,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerState> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_boss(&self) -> Option<&BossState> {
        match &self.kind {
            EntityKind::Boss(b) => Some(b),
            _ => None,
        }
    }

    /// Advance this entity by one frame.  New entities (bullets) are pushed
    /// into `spawned` rather than into the active set directly.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &UpdateContext<'_>,
        rng: &mut R,
        spawned: &mut Vec<Entity>,
    ) {
        if !self.active {
            return;
        }
        if let EntityKind::Player(_) = self.kind {
            crate::player::update(self, ctx, spawned);
            return;
        }

        let dt = ctx.delta_ms.max(0.0);
        let secs = dt / 1000.0;
        let Entity {
            pos,
            size,
            kind,
            active,
            ..
        } = self;

        match kind {
            EntityKind::Player(_) => {}
            EntityKind::PlayerBullet { speed } => {
                pos.x += *speed * secs;
                if pos.x > ctx.canvas.width {
                    *active = false;
                }
            }
            EntityKind::EnemyBullet { speed } | EntityKind::Enemy { speed, .. } => {
                pos.x -= *speed * secs;
                if pos.x < -size.x {
                    *active = false;
                }
            }
            EntityKind::Boss(boss) => {
                boss.shake_ms += dt;
                let shake = Vec2::new(
                    (boss.shake_ms / 100.0).sin() * BOSS_SHAKE_AMOUNT,
                    (boss.shake_ms / 150.0).cos() * BOSS_SHAKE_AMOUNT,
                );
                *pos = boss.base + shake;

                let ready = boss
                    .last_shot_ms
                    .map_or(true, |last| ctx.now_ms - last > boss.shot_cooldown_ms);
                if ready {
                    let bands = &ctx.gameplay.boss_fire_bands;
                    if !bands.is_empty() {
                        let band = bands[rng.gen_range(0..bands.len())];
                        spawned.push(Entity::enemy_bullet(Vec2::new(pos.x, band), boss.stage));
                    }
                    boss.last_shot_ms = Some(ctx.now_ms);
                }
            }
            EntityKind::Explosion { timer_ms, .. } => {
                *timer_ms -= dt;
                if *timer_ms <= 0.0 {
                    *active = false;
                }
            }
        }
    }

    /// Hit reaction for enemies and the boss.  Scoring is left to the caller.
    pub fn hit(&mut self) -> HitOutcome {
        if !self.active {
            return HitOutcome::Ignored;
        }
        let center = self.center();
        match &mut self.kind {
            EntityKind::Enemy { .. } => {
                self.active = false;
                HitOutcome::Destroyed {
                    score: ENEMY_KILL_SCORE,
                    explosion: Entity::explosion(center, false),
                }
            }
            EntityKind::Boss(boss) => {
                boss.hp = boss.hp.saturating_sub(1);
                if boss.hp == 0 {
                    self.active = false;
                    HitOutcome::Destroyed {
                        score: BOSS_KILL_SCORE,
                        explosion: Entity::explosion(center, true),
                    }
                } else {
                    HitOutcome::Damaged { hp_left: boss.hp }
                }
            }
            _ => HitOutcome::Ignored,
        }
    }
}
