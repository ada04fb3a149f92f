//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, IDs never reused)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod physics;
pub mod rules;
pub mod snapshot;

pub use clock::Clock;
pub use collision::{CollisionEvent, aabb_overlap, circle_overlap, collision_pass, entities_overlap};
pub use entity::{Bounds, Category, CustomState, Entity, EntityId, EntityStore};
pub use physics::{ControlState, physics_pass};
pub use rules::{GamePhase, RuleEngine};
pub use snapshot::{Hud, Snapshot};
