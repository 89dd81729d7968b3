//! Polled input snapshot.
//!
//! The front-end is the single writer and the simulation step the single
//! reader.  Only the latest state per source is kept; nothing is queued.

use std::collections::HashSet;

use glam::Vec2;

/// Logical keys the simulation cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Shoot,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    keys: HashSet<Key>,
    /// Last known pointer position in canvas units, present only while held
    pointer: Option<Vec2>,
    /// Timestamp (ms) at which the pointer was pressed
    pointer_down_at: Option<f64>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Writer side ──────────────────────────────────────────────────────────

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn clear_keys(&mut self) {
        self.keys.clear();
    }

    /// Pointer pressed at `pos`.  A press while already held keeps the
    /// original press time.
    pub fn pointer_down(&mut self, pos: Vec2, now_ms: f64) {
        self.pointer = Some(pos);
        if self.pointer_down_at.is_none() {
            self.pointer_down_at = Some(now_ms);
        }
    }

    /// Pointer dragged to `pos`; ignored unless the pointer is held.
    pub fn pointer_moved(&mut self, pos: Vec2) {
        if self.pointer.is_some() {
            self.pointer = Some(pos);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer = None;
        self.pointer_down_at = None;
    }

    // ── Reader side ──────────────────────────────────────────────────────────

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn pointer_position(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn is_pointer_held(&self) -> bool {
        self.pointer_down_at.is_some()
    }

    /// How long the pointer has been held at `now_ms`, if it is held.
    pub fn pointer_held_for(&self, now_ms: f64) -> Option<f64> {
        self.pointer_down_at.map(|since| (now_ms - since).max(0.0))
    }

    /// A pointer held longer than `hold_threshold_ms` counts as the shoot key.
    pub fn wants_continuous_fire(&self, now_ms: f64, hold_threshold_ms: f64) -> bool {
        self.pointer_held_for(now_ms)
            .is_some_and(|held| held > hold_threshold_ms)
    }

    pub fn wants_fire(&self, now_ms: f64, hold_threshold_ms: f64) -> bool {
        self.is_key_pressed(Key::Shoot) || self.wants_continuous_fire(now_ms, hold_threshold_ms)
    }
}
