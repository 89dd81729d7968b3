//! Game phase state machine.
//!
//! Phases change either because of simulation outcomes (boss destroyed,
//! lives exhausted, stage timer expired) or because the UI sends one of the
//! opaque `Command`s below.  `apply_command` ignores commands that make no
//! sense in the current phase.

use crate::entities::{Category, Entity};
use crate::player;
use crate::state::GameState;

pub const STARTING_LIVES: u32 = 3;
pub const FINAL_STAGE: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Title,
    Instructions,
    Playing,
    Boss,
    StageClear,
    GameClear,
    GameOver,
}

impl Phase {
    /// Phases in which the simulation runs.
    pub fn is_active_play(self) -> bool {
        matches!(self, Phase::Playing | Phase::Boss)
    }
}

/// UI commands, independent of whichever button or key produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Title screen start button
    Start,
    /// Leave the instructions and start a run
    Begin,
    /// Next stage (or the ending after the last one)
    Advance,
    ReturnToTitle,
    Restart,
    /// Tap/click on the playfield: one shot, cooldown permitting
    Fire,
}

impl GameState {
    /// Apply a UI command.  Returns `false` if the command was not valid in
    /// the current phase and nothing changed.
    pub fn apply_command(&mut self, command: Command, now_ms: f64) -> bool {
        match (self.phase, command) {
            (Phase::Title, Command::Start) => {
                self.set_phase(Phase::Instructions);
                true
            }
            (Phase::Instructions, Command::Begin) => {
                self.begin_run();
                true
            }
            (Phase::StageClear, Command::Advance) => {
                self.advance_stage();
                true
            }
            (Phase::StageClear, Command::ReturnToTitle)
            | (Phase::GameClear, Command::Restart)
            | (Phase::GameOver, Command::Restart) => {
                self.restart();
                true
            }
            (phase, Command::Fire) if phase.is_active_play() => self.fire(now_ms),
            (phase, command) => {
                log::debug!("ignoring {:?} in {:?}", command, phase);
                false
            }
        }
    }

    /// Start a fresh run on stage 1 with a single player in the active set.
    pub fn begin_run(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.stage = 1;
        self.stage_timer_ms = 0.0;
        self.spawn_timer_ms = 0.0;
        self.scroll_offset = 0.0;
        self.clear_world();
        let player = Entity::player(&self.gameplay);
        self.spawn(player);
        self.set_phase(Phase::Playing);
        log::info!("run started");
    }

    /// From the stage-clear screen: next stage, or the ending after the last.
    pub fn advance_stage(&mut self) {
        if self.stage >= FINAL_STAGE {
            self.set_phase(Phase::GameClear);
            log::info!("all stages cleared, final score {}", self.score);
            return;
        }
        self.stage += 1;
        self.stage_timer_ms = 0.0;
        self.spawn_timer_ms = 0.0;
        self.lives = STARTING_LIVES;
        self.keep_only_player();
        self.set_phase(Phase::Playing);
        log::info!("stage {} started", self.stage);
    }

    /// Full reset back to the title screen.
    pub fn restart(&mut self) {
        self.clear_world();
        self.stage = 1;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.stage_timer_ms = 0.0;
        self.spawn_timer_ms = 0.0;
        self.scroll_offset = 0.0;
        self.boss_hp = 0;
        self.max_boss_hp = 0;
        self.set_phase(Phase::Title);
    }

    /// Stage timer expired: clear the enemies and bring in the boss.
    pub(crate) fn enter_boss_phase(&mut self) {
        self.remove_category(Category::Enemy);
        self.set_phase(Phase::Boss);
        let boss = Entity::boss(self.stage, self.canvas);
        self.spawn(boss);
        log::info!("boss for stage {} arrives with {} hp", self.stage, self.boss_hp);
    }

    /// Boss hp reached zero during the resolution pass.
    /// A game over earlier in the same pass stands; the kill still scores.
    pub(crate) fn on_boss_destroyed(&mut self) {
        self.sync_handles();
        if self.phase != Phase::Boss {
            log::info!("boss destroyed during {:?}, phase kept", self.phase);
            return;
        }
        self.set_phase(Phase::StageClear);
        log::info!("stage {} cleared, score {}", self.stage, self.score);
    }

    fn fire(&mut self, now_ms: f64) -> bool {
        let mut spawned = Vec::new();
        let fired = self
            .player_mut()
            .is_some_and(|p| player::try_shoot(p, now_ms, &mut spawned));
        for bullet in spawned {
            self.spawn(bullet);
        }
        fired
    }
}
