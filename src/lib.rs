//! Arcade Core - a generic fixed-timestep 2D arcade game loop
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, entities, physics, collisions, rules)
//! - `session`: One `GameSession` per play session, drives the loop
//! - `config`: Data-driven game tuning with fail-fast validation
//! - `input`: Named input actions with per-tick edge handling
//! - `render` / `audio`: Capability traits for external collaborators

pub mod audio;
pub mod config;
pub mod input;
pub mod render;
pub mod session;
pub mod sim;

pub use audio::{GameEvent, NullSink, SoundQueue, SoundSink};
pub use config::{BoundsPolicy, ConfigError, GameConfig, MotionRule, SpawnRule, WinCondition};
pub use input::{InputAction, InputState};
pub use render::{NullRenderer, Renderer};
pub use session::GameSession;
pub use sim::{Bounds, Category, CollisionEvent, Entity, EntityId, GamePhase, Snapshot};

/// Loop defaults shared by configuration and tests
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_STEP: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 5;
    /// Clamp on raw frame deltas before they enter the accumulator
    pub const MAX_FRAME_DELTA: f32 = 0.1;
}
