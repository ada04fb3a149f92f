//! Game configuration
//!
//! Every behavior of the core is parameterized here; the loop itself has no
//! per-game constants. Configs deserialize from JSON and are validated once at
//! session construction. Validation is the only startup failure path:
//! a config that passes `validate()` can run a whole session without errors.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;
use crate::sim::{Bounds, Category, CustomState};

/// Configuration rejected at startup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("fixed_step_seconds must be positive (got {0})")]
    NonPositiveStep(f32),

    #[error("max_ticks_per_frame must be at least 1")]
    ZeroTickCap,

    #[error("max_frame_delta must cover at least one fixed step (got {0})")]
    FrameClampTooSmall(f32),

    #[error("world bounds are inverted or empty (min {min}, max {max})")]
    EmptyWorld { min: Vec2, max: Vec2 },

    #[error("category `{}` is used but has no bounds policy", .0.as_str())]
    MissingBoundsPolicy(Category),

    #[error("player bounds must have a positive size")]
    DegeneratePlayerBounds,

    #[error("spawn rule for `{}` has a zero interval", .0.as_str())]
    ZeroSpawnInterval(Category),

    #[error("spawn rule for `{}` carries custom state for a different category", .0.as_str())]
    MismatchedSpawnState(Category),
}

/// Per-category motion rule for the physics pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionRule {
    /// Position is never integrated
    Static,
    /// Constant velocity
    #[default]
    Linear,
    /// Velocity accumulates the world gravity, then integrates
    Gravity,
}

/// What happens when an entity crosses the world rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsPolicy {
    /// Pushed back inside; the escaping velocity component is zeroed
    Clamp,
    /// Wraps to the opposite edge, torus style
    Wrap,
    /// Culled once fully outside (fatal when it culls the player)
    Remove,
}

/// World rectangle, y grows downward as on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(800.0, 450.0),
        }
    }
}

/// The player entity as it exists at session start and after restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub start: Vec2,
    pub bounds: Bounds,
    pub health: i32,
    /// Horizontal speed while a move action is held
    pub move_speed: f32,
    /// Upward impulse applied on each jump press
    pub jump_impulse: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(100.0, 225.0),
            bounds: Bounds::Aabb { half: Vec2::new(12.0, 16.0) },
            health: 3,
            move_speed: 180.0,
            jump_impulse: 420.0,
        }
    }
}

/// Rate/interval spawner for one category
///
/// The interval shrinks with score down to `min_interval_ticks`, which is the
/// whole difficulty curve: spawning is a pure function of tick count, score
/// and the session RNG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    pub category: Category,
    pub bounds: Bounds,
    pub custom: CustomState,
    /// Spawn position jitter range (inclusive corners)
    pub pos_min: Vec2,
    pub pos_max: Vec2,
    /// Spawn velocity jitter range (inclusive corners)
    pub vel_min: Vec2,
    pub vel_max: Vec2,
    pub start_interval_ticks: u64,
    pub min_interval_ticks: u64,
    /// Ticks shaved off the interval per point of score
    #[serde(default)]
    pub shrink_per_point: u64,
}

impl SpawnRule {
    /// Interval in effect at the given score
    pub fn interval_at(&self, score: u64) -> u64 {
        self.start_interval_ticks
            .saturating_sub(self.shrink_per_point.saturating_mul(score))
            .max(self.min_interval_ticks)
            .max(1)
    }
}

/// Condition that ends a run in victory
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    /// The run only ends in game over
    #[default]
    Endless,
    /// Win once every collectible that ever spawned is collected
    CollectAll,
    /// Win once the player has traveled this far along +x from its start
    DistanceReached(f32),
}

/// Complete per-session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub fixed_step_seconds: f32,
    pub max_ticks_per_frame: u32,
    pub max_frame_delta: f32,
    pub world: WorldBounds,
    /// Acceleration applied to categories with the `Gravity` motion rule
    pub gravity: Vec2,
    /// Motion rule per category; absent categories default to `Linear`
    pub motion: HashMap<Category, MotionRule>,
    /// Bounds policy per category; required for every category that can exist
    pub bounds_policy: HashMap<Category, BoundsPolicy>,
    /// Ordered interaction matrix for the collision pass
    pub interactions: Vec<(Category, Category)>,
    pub player: PlayerConfig,
    pub spawns: Vec<SpawnRule>,
    pub win: WinCondition,
    /// Session RNG seed; same seed + same input = same run
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut bounds_policy = HashMap::new();
        bounds_policy.insert(Category::Player, BoundsPolicy::Clamp);
        bounds_policy.insert(Category::Obstacle, BoundsPolicy::Remove);
        bounds_policy.insert(Category::Collectible, BoundsPolicy::Remove);
        bounds_policy.insert(Category::Projectile, BoundsPolicy::Remove);
        bounds_policy.insert(Category::Particle, BoundsPolicy::Remove);

        let mut motion = HashMap::new();
        motion.insert(Category::Player, MotionRule::Gravity);

        Self {
            fixed_step_seconds: consts::FIXED_STEP,
            max_ticks_per_frame: consts::MAX_TICKS_PER_FRAME,
            max_frame_delta: consts::MAX_FRAME_DELTA,
            world: WorldBounds::default(),
            gravity: Vec2::new(0.0, 900.0),
            motion,
            bounds_policy,
            interactions: vec![
                (Category::Player, Category::Obstacle),
                (Category::Player, Category::Collectible),
                (Category::Projectile, Category::Obstacle),
            ],
            player: PlayerConfig::default(),
            spawns: Vec::new(),
            win: WinCondition::default(),
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Load a config from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Motion rule for a category (`Linear` when unconfigured)
    pub fn motion_rule(&self, category: Category) -> MotionRule {
        self.motion.get(&category).copied().unwrap_or_default()
    }

    /// Bounds policy for a category; only call after `validate()`
    pub fn policy(&self, category: Category) -> BoundsPolicy {
        self.bounds_policy
            .get(&category)
            .copied()
            .unwrap_or(BoundsPolicy::Remove)
    }

    /// Every category this config can put into the world
    fn used_categories(&self) -> Vec<Category> {
        let mut used = vec![Category::Player];
        for rule in &self.spawns {
            if !used.contains(&rule.category) {
                used.push(rule.category);
            }
        }
        for &(a, b) in &self.interactions {
            if !used.contains(&a) {
                used.push(a);
            }
            if !used.contains(&b) {
                used.push(b);
            }
        }
        used
    }

    /// Fail-fast startup validation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_step_seconds <= 0.0 {
            return Err(ConfigError::NonPositiveStep(self.fixed_step_seconds));
        }
        if self.max_ticks_per_frame == 0 {
            return Err(ConfigError::ZeroTickCap);
        }
        if self.max_frame_delta < self.fixed_step_seconds {
            return Err(ConfigError::FrameClampTooSmall(self.max_frame_delta));
        }
        let size = self.world.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(ConfigError::EmptyWorld {
                min: self.world.min,
                max: self.world.max,
            });
        }
        for category in self.used_categories() {
            if !self.bounds_policy.contains_key(&category) {
                return Err(ConfigError::MissingBoundsPolicy(category));
            }
        }
        let half = self.player.bounds.half_extents();
        if half.x <= 0.0 || half.y <= 0.0 {
            return Err(ConfigError::DegeneratePlayerBounds);
        }
        for rule in &self.spawns {
            if rule.start_interval_ticks == 0 || rule.min_interval_ticks == 0 {
                return Err(ConfigError::ZeroSpawnInterval(rule.category));
            }
            if !rule.custom_matches_category() {
                return Err(ConfigError::MismatchedSpawnState(rule.category));
            }
        }
        Ok(())
    }
}

impl SpawnRule {
    fn custom_matches_category(&self) -> bool {
        matches!(
            (self.category, self.custom),
            (Category::Player, CustomState::Player { .. })
                | (Category::Obstacle, CustomState::Obstacle { .. })
                | (Category::Collectible, CustomState::Collectible { .. })
                | (Category::Projectile, CustomState::Projectile)
                | (Category::Particle, CustomState::Particle { .. })
        )
    }
}
