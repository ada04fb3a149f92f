//! Entities and the entity store
//!
//! Entities are flat structs owned exclusively by the [`EntityStore`]. Removal
//! during a pass only flips the `alive` flag; physical removal happens in
//! end-of-tick compaction, so iteration mid-pass is always safe.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Entity identifier, unique within a session, never reused
pub type EntityId = u32;

/// Role tag selecting update, collision and rule behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Player,
    Obstacle,
    Collectible,
    Projectile,
    Particle,
}

impl Category {
    /// All categories, in a fixed order
    pub const ALL: [Category; 5] = [
        Category::Player,
        Category::Obstacle,
        Category::Collectible,
        Category::Projectile,
        Category::Particle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Player => "player",
            Category::Obstacle => "obstacle",
            Category::Collectible => "collectible",
            Category::Projectile => "projectile",
            Category::Particle => "particle",
        }
    }
}

/// Bounding shape, centered on the entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bounds {
    /// Axis-aligned box with the given half extents
    Aabb { half: Vec2 },
    /// Circle with the given radius
    Circle { radius: f32 },
}

impl Bounds {
    /// Half extents of the shape's bounding box
    ///
    /// Mixed-shape collision pairs and all bounds policies work on this box.
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Bounds::Aabb { half } => half,
            Bounds::Circle { radius } => Vec2::splat(radius),
        }
    }
}

/// Category-specific entity state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomState {
    Player { health: i32 },
    Obstacle { damage: i32, bounty: u32 },
    Collectible { value: u32 },
    Projectile,
    Particle { life: f32 },
}

/// A simulated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub category: Category,
    pub pos: Vec2,
    pub vel: Vec2,
    pub bounds: Bounds,
    /// False once removed; compacted away at end of tick
    pub alive: bool,
    pub custom: CustomState,
}

/// Flat entity storage with insertion-order iteration
///
/// IDs are monotonically increasing and never reused within a session, so
/// iteration order is stable across ticks and identical between replays.
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Add an entity, assigning it the next free ID
    pub fn add(
        &mut self,
        category: Category,
        pos: Vec2,
        vel: Vec2,
        bounds: Bounds,
        custom: CustomState,
    ) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            category,
            pos,
            vel,
            bounds,
            alive: true,
            custom,
        });
        id
    }

    /// Mark an entity dead; a no-op if the ID is gone already
    pub fn remove(&mut self, id: EntityId) {
        if let Some(e) = self.entities.iter_mut().find(|e| e.id == id) {
            e.alive = false;
        }
    }

    /// Look up a live entity by ID
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id && e.alive)
    }

    /// Mutable lookup of a live entity by ID
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id && e.alive)
    }

    /// Iterate live entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    /// Mutably iterate live entities in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter(|e| e.alive)
    }

    /// Iterate live entities of one category in insertion order
    pub fn iter_category(&self, category: Category) -> impl Iterator<Item = &Entity> {
        self.iter().filter(move |e| e.category == category)
    }

    /// Number of live entities of one category
    pub fn count_category(&self, category: Category) -> usize {
        self.iter_category(category).count()
    }

    /// The single live player entity, if any
    pub fn player(&self) -> Option<&Entity> {
        self.iter_category(Category::Player).next()
    }

    /// Drop dead entities; call after all passes for the tick have run
    pub fn compact(&mut self) {
        self.entities.retain(|e| e.alive);
    }

    /// Remove every entity but keep the ID counter running
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.iter().filter(|e| e.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
