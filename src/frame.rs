//! Frame scheduler: turns display-refresh timestamps into simulation work.
//!
//! Each `frame` call is one whole frame: delta computation, the simulation
//! step and the collision pass all complete before it returns.  While paused
//! no frame work is started at all.

use rand::Rng;

use crate::collision::{self, CollisionReport};
use crate::compute::{self, StepReport};
use crate::input::InputSnapshot;
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Clamped elapsed time since the previous frame (ms)
    pub delta_ms: f32,
    /// `None` when the phase was not an active-play phase or the loop is paused
    pub step: Option<StepReport>,
    pub collisions: Option<CollisionReport>,
}

#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    last_timestamp_ms: Option<f64>,
    paused: bool,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time since the previous frame, never negative.  The first
    /// frame has no predecessor and gets zero.
    pub fn delta_ms(&mut self, now_ms: f64) -> f32 {
        let delta = self
            .last_timestamp_ms
            .map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_timestamp_ms = Some(now_ms);
        delta as f32
    }

    /// Run one frame at timestamp `now_ms`.
    pub fn frame<R: Rng + ?Sized>(
        &mut self,
        state: &mut GameState,
        input: &InputSnapshot,
        now_ms: f64,
        rng: &mut R,
    ) -> FrameReport {
        let delta_ms = self.delta_ms(now_ms);
        let mut report = FrameReport {
            delta_ms,
            step: None,
            collisions: None,
        };
        if self.paused || !state.phase.is_active_play() {
            return report;
        }

        self.frames += 1;
        report.step = Some(compute::step(state, input, delta_ms, now_ms, rng));
        if state.phase.is_active_play() {
            report.collisions = Some(collision::resolve_collisions(state));
        }
        report
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("paused after {} frames", self.frames);
            self.paused = true;
        }
    }

    /// Resume without integrating the time spent paused.
    pub fn resume(&mut self) {
        if self.paused {
            log::info!("resumed");
            self.paused = false;
            self.last_timestamp_ms = None;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frames that ran a simulation step.
    pub fn simulated_frames(&self) -> u64 {
        self.frames
    }
}
