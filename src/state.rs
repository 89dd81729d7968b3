//! The run context: phase, counters, the active set, and handles to the
//! singleton entities.  Every simulation function takes this explicitly.

use crate::config::{Canvas, GameConfig, GameplayConfig};
use crate::entities::{Category, Entity};
use crate::phase::{Phase, STARTING_LIVES};
use crate::player::{self, PlayerHit};
use crate::world::{EntityKey, World};

#[derive(Clone, Debug)]
pub struct GameState {
    pub phase: Phase,
    /// Only ever accumulates during a run
    pub score: u64,
    pub lives: u32,
    /// 1-based
    pub stage: u32,
    /// Time spent in `Playing` since the stage started (ms)
    pub stage_timer_ms: f32,
    /// Time since the last enemy spawn (ms)
    pub spawn_timer_ms: f32,
    /// Mirror of the boss's hit points for the HUD; 0 when there is no boss
    pub boss_hp: u32,
    pub max_boss_hp: u32,
    /// Horizontal background scroll, wraps at the canvas width
    pub scroll_offset: f32,
    pub world: World,
    pub canvas: Canvas,
    pub gameplay: GameplayConfig,
    player: Option<EntityKey>,
    boss: Option<EntityKey>,
}

impl GameState {
    /// Fresh state on the title screen.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: Phase::Title,
            score: 0,
            lives: STARTING_LIVES,
            stage: 1,
            stage_timer_ms: 0.0,
            spawn_timer_ms: 0.0,
            boss_hp: 0,
            max_boss_hp: 0,
            scroll_offset: 0.0,
            world: World::new(),
            canvas: config.canvas,
            gameplay: config.gameplay.clone(),
            player: None,
            boss: None,
        }
    }

    // ── Active set ───────────────────────────────────────────────────────────

    /// Add an entity, recording the handle if it is the player or the boss.
    /// A second player or boss replaces (and deactivates) the previous one.
    pub fn spawn(&mut self, entity: Entity) -> EntityKey {
        let category = entity.category();
        let key = self.world.spawn(entity);
        match category {
            Category::Player => {
                if let Some(old) = self.player.replace(key) {
                    self.deactivate(old);
                }
            }
            Category::Boss => {
                if let Some(old) = self.boss.replace(key) {
                    self.deactivate(old);
                }
                if let Some(boss) = self.world.get(key).and_then(Entity::as_boss) {
                    self.boss_hp = boss.hp;
                    self.max_boss_hp = boss.max_hp;
                }
            }
            _ => {}
        }
        key
    }

    fn deactivate(&mut self, key: EntityKey) {
        if let Some(entity) = self.world.get_mut(key) {
            entity.deactivate();
        }
    }

    pub fn player_key(&self) -> Option<EntityKey> {
        self.player
    }

    pub fn boss_key(&self) -> Option<EntityKey> {
        self.boss
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|key| self.world.get(key))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.and_then(|key| self.world.get_mut(key))
    }

    pub fn boss(&self) -> Option<&Entity> {
        self.boss.and_then(|key| self.world.get(key))
    }

    /// Drop stale handles after entities have been removed.
    pub(crate) fn sync_handles(&mut self) {
        let world = &self.world;
        let alive = |key: &EntityKey| world.get(*key).is_some_and(Entity::is_active);
        if !self.player.as_ref().is_some_and(alive) {
            self.player = None;
        }
        if !self.boss.as_ref().is_some_and(alive) {
            self.boss = None;
            self.boss_hp = 0;
            self.max_boss_hp = 0;
        }
    }

    pub(crate) fn clear_world(&mut self) {
        self.world.clear();
        self.sync_handles();
    }

    pub(crate) fn remove_category(&mut self, category: Category) {
        self.world.retain(|e| e.category() != category);
        self.sync_handles();
    }

    pub(crate) fn keep_only_player(&mut self) {
        self.world.retain(|e| e.category() == Category::Player);
        self.sync_handles();
    }

    /// Remove inactive entities at the end of a step.
    pub(crate) fn cull(&mut self) -> usize {
        let removed = self.world.cull();
        self.sync_handles();
        removed
    }

    // ── Run counters ─────────────────────────────────────────────────────────

    pub(crate) fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Hit the player.  Losing the last life ends the game on the spot.
    pub fn hit_player(&mut self) -> PlayerHit {
        let Some(entity) = self.player.and_then(|key| self.world.get_mut(key)) else {
            return PlayerHit::Ignored;
        };
        let outcome = player::take_hit(entity, &mut self.lives);
        match outcome {
            PlayerHit::OutOfLives => {
                log::info!("player out of lives on stage {}", self.stage);
                self.set_phase(Phase::GameOver);
            }
            PlayerHit::LifeLost { lives_left } => {
                log::debug!("player hit, {} lives left", lives_left);
            }
            PlayerHit::Ignored => {}
        }
        outcome
    }

    pub fn is_player_invulnerable(&self) -> bool {
        self.player().is_some_and(player::is_invulnerable)
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::info!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}
