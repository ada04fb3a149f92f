//! Collision detection
//!
//! Broad phase partitions live entities by category and only tests the pairs
//! named by the configured interaction matrix. Narrow phase is an AABB overlap
//! or circle distance test depending on shapes; mixed pairs fall back to each
//! shape's bounding box.
//!
//! Event order is deterministic: interaction-matrix order first, then entity
//! store iteration order, which keeps replays and tests reproducible.

use glam::Vec2;

use super::entity::{Bounds, Category, Entity, EntityId, EntityStore};

/// A detected overlap between two entities, consumed within the same tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: EntityId,
    pub b: EntityId,
    /// The configured category pair that produced this event
    pub categories: (Category, Category),
}

/// Axis-aligned box overlap, centers and half extents, strict on touch
#[inline]
pub fn aabb_overlap(pos_a: Vec2, half_a: Vec2, pos_b: Vec2, half_b: Vec2) -> bool {
    let delta = (pos_a - pos_b).abs();
    let reach = half_a + half_b;
    delta.x < reach.x && delta.y < reach.y
}

/// Circle overlap, strict on touch
#[inline]
pub fn circle_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    pos_a.distance_squared(pos_b) < reach * reach
}

/// Shape-aware overlap test for two entities
pub fn entities_overlap(a: &Entity, b: &Entity) -> bool {
    match (a.bounds, b.bounds) {
        (Bounds::Circle { radius: ra }, Bounds::Circle { radius: rb }) => {
            circle_overlap(a.pos, ra, b.pos, rb)
        }
        // Mixed pairs use each entity's bounding box
        _ => aabb_overlap(
            a.pos,
            a.bounds.half_extents(),
            b.pos,
            b.bounds.half_extents(),
        ),
    }
}

/// Run broad + narrow phase over the store for the configured pairs
///
/// The same entity pair colliding under multiple configured rules produces one
/// event per rule; deduplication is the rule engine's job.
pub fn collision_pass(
    store: &EntityStore,
    interactions: &[(Category, Category)],
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    for &(cat_a, cat_b) in interactions {
        let left: Vec<&Entity> = store.iter_category(cat_a).collect();
        let right: Vec<&Entity> = store.iter_category(cat_b).collect();

        for (i, a) in left.iter().enumerate() {
            // Same-category pairs: unordered combinations only
            let start = if cat_a == cat_b { i + 1 } else { 0 };
            for b in &right[start..] {
                if a.id == b.id {
                    continue;
                }
                if entities_overlap(a, b) {
                    events.push(CollisionEvent {
                        a: a.id,
                        b: b.id,
                        categories: (cat_a, cat_b),
                    });
                }
            }
        }
    }

    events
}
