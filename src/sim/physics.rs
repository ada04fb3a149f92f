//! Physics/update pass
//!
//! Runs once per tick, before collision detection. Applies the per-category
//! motion rule, player control, particle aging, then the per-category world
//! bounds policy. Deterministic given the fixed step: no RNG in this pass.

use glam::Vec2;

use crate::config::{BoundsPolicy, GameConfig, MotionRule};

use super::entity::{Category, CustomState, Entity, EntityStore};

/// Player control for one tick, already reduced from raw input
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlState {
    /// Horizontal axis in [-1, 1]
    pub move_axis: f32,
    /// Jump edge for this tick
    pub jump: bool,
}

/// Advance every live entity by one fixed step
pub fn physics_pass(store: &mut EntityStore, config: &GameConfig, control: ControlState, dt: f32) {
    for entity in store.iter_mut() {
        if entity.category == Category::Player {
            apply_player_control(entity, config, control);
        }

        match config.motion_rule(entity.category) {
            MotionRule::Static => {}
            MotionRule::Linear => {
                entity.pos += entity.vel * dt;
            }
            MotionRule::Gravity => {
                entity.vel += config.gravity * dt;
                entity.pos += entity.vel * dt;
            }
        }

        if let CustomState::Particle { ref mut life } = entity.custom {
            *life -= dt;
            if *life <= 0.0 {
                entity.alive = false;
                continue;
            }
        }

        apply_bounds_policy(entity, config);
    }
}

/// Movement input: the held axis drives horizontal velocity directly, a jump
/// edge replaces vertical velocity with the configured impulse (y grows down)
fn apply_player_control(entity: &mut Entity, config: &GameConfig, control: ControlState) {
    entity.vel.x = control.move_axis * config.player.move_speed;
    if control.jump {
        entity.vel.y = -config.player.jump_impulse;
    }
}

fn apply_bounds_policy(entity: &mut Entity, config: &GameConfig) {
    let world = &config.world;
    let half = entity.bounds.half_extents();

    match config.policy(entity.category) {
        BoundsPolicy::Clamp => {
            let lo = world.min + half;
            let hi = world.max - half;
            let clamped = entity.pos.clamp(lo, hi);
            // Zero the velocity component that pushed us out
            if clamped.x != entity.pos.x {
                entity.vel.x = 0.0;
            }
            if clamped.y != entity.pos.y {
                entity.vel.y = 0.0;
            }
            entity.pos = clamped;
        }
        BoundsPolicy::Wrap => {
            entity.pos = wrap_point(entity.pos, world.min, world.max);
        }
        BoundsPolicy::Remove => {
            // Culled only once the whole bounding box has left the world
            let outside = entity.pos.x + half.x < world.min.x
                || entity.pos.x - half.x > world.max.x
                || entity.pos.y + half.y < world.min.y
                || entity.pos.y - half.y > world.max.y;
            if outside {
                entity.alive = false;
            }
        }
    }
}

fn wrap_point(pos: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    let size = max - min;
    let rel = pos - min;
    Vec2::new(rel.x.rem_euclid(size.x), rel.y.rem_euclid(size.y)) + min
}
