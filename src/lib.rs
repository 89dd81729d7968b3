//! Side-scrolling arcade shooter: simulation core.
//!
//! - `entities` / `player`: the entity model and the player controller
//! - `world` / `state`: the active set and the run context
//! - `collision`: hitboxes and the per-frame resolution pass
//! - `spawner`: stage timer and enemy cadence
//! - `phase`: game phases and UI commands
//! - `compute` / `frame`: the simulation step and the frame scheduler

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod frame;
pub mod input;
pub mod phase;
pub mod player;
pub mod spawner;
pub mod state;
pub mod world;

pub use config::GameConfig;
pub use frame::FrameScheduler;
pub use input::{InputSnapshot, Key};
pub use phase::{Command, Phase};
pub use state::GameState;
