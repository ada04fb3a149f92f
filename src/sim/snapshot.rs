//! Per-frame world snapshot
//!
//! The core never calls into rendering directly; it hands each frame an owned,
//! immutable copy of the world. Consumers can hold or drop it freely, and
//! nothing they do flows back into the simulation.

use serde::{Deserialize, Serialize};

use super::entity::{Category, CustomState, Entity, EntityStore};
use super::rules::{GamePhase, RuleEngine};

/// Scalar values for heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub health: i32,
    /// Best +x displacement of the player from its start
    pub distance: f32,
    /// Ticks simulated while playing
    pub ticks: u64,
}

/// Immutable view of one rendered frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub hud: Hud,
    /// All alive entities, in store iteration order
    pub entities: Vec<Entity>,
}

impl Snapshot {
    /// Copy the current world state; called once per rendered frame
    pub fn capture(store: &EntityStore, rules: &RuleEngine) -> Self {
        let health = store
            .player()
            .map(|p| match p.custom {
                CustomState::Player { health } => health,
                _ => 0,
            })
            .unwrap_or(0);

        Self {
            phase: rules.phase(),
            hud: Hud {
                score: rules.score(),
                health,
                distance: rules.distance(),
                ticks: rules.ticks(),
            },
            entities: store.iter().cloned().collect(),
        }
    }

    /// Alive entities of one category, in store order
    pub fn entities_of(&self, category: Category) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::entity::Bounds;
    use glam::Vec2;

    #[test]
    fn test_snapshot_skips_dead_entities() {
        let mut rules = RuleEngine::new(GameConfig::default());
        let mut store = EntityStore::new();
        rules.populate(&mut store);

        let dead = store.add(
            Category::Obstacle,
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            Bounds::Aabb { half: Vec2::splat(5.0) },
            CustomState::Obstacle { damage: 1, bounty: 0 },
        );
        store.remove(dead);

        let snapshot = Snapshot::capture(&store, &rules);
        assert_eq!(snapshot.entities.len(), 1);
        assert!(snapshot.entities.iter().all(|e| e.id != dead));
        assert_eq!(snapshot.hud.health, GameConfig::default().player.health);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let mut rules = RuleEngine::new(GameConfig::default());
        let mut store = EntityStore::new();
        rules.populate(&mut store);

        let snapshot = Snapshot::capture(&store, &rules);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}
