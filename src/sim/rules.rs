//! Gameplay rule engine
//!
//! Owns the phase state machine and everything that reacts to collisions and
//! elapsed ticks: scoring, damage, despawning, and interval-based spawning.
//! Spawned entities are queued and only enter the store at the end of the rule
//! pass, never mid-pass. All randomness in the simulation (spawn jitter) lives
//! here, drawn from the session-seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::GameEvent;
use crate::config::{GameConfig, WinCondition};
use crate::input::InputEdges;

use super::collision::CollisionEvent;
use super::entity::{Bounds, Category, CustomState, EntityId, EntityStore};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Waiting for the start input
    Ready,
    /// Active simulation
    Playing,
    /// Frozen; resumes on the pause toggle
    Paused,
    /// Run ended in defeat
    GameOver,
    /// Run ended in victory
    Victory,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameover",
            GamePhase::Victory => "victory",
        }
    }
}

/// An entity waiting to be added at the end of the rule pass
#[derive(Debug, Clone)]
struct PendingSpawn {
    category: Category,
    pos: Vec2,
    vel: Vec2,
    bounds: Bounds,
    custom: CustomState,
}

/// Drives phases, counters and spawning for one session
#[derive(Debug, Clone)]
pub struct RuleEngine {
    config: GameConfig,
    phase: GamePhase,
    score: u64,
    /// Ticks elapsed while playing; pauses do not advance difficulty
    ticks: u64,
    rng: Pcg32,
    restart_count: u64,
    last_spawn_tick: Vec<u64>,
    collectibles_spawned: u64,
    player_start_x: f32,
    best_distance: f32,
    pending: Vec<PendingSpawn>,
}

impl RuleEngine {
    pub fn new(config: GameConfig) -> Self {
        let spawn_count = config.spawns.len();
        let seed = config.seed;
        let player_start_x = config.player.start.x;
        Self {
            config,
            phase: GamePhase::Ready,
            score: 0,
            ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            restart_count: 0,
            last_spawn_tick: vec![0; spawn_count],
            collectibles_spawned: 0,
            player_start_x,
            best_distance: 0.0,
            pending: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Ticks simulated while in the playing phase
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Best +x displacement of the player from its start
    pub fn distance(&self) -> f32 {
        self.best_distance
    }

    /// Fill an empty store with the initial world
    pub fn populate(&mut self, store: &mut EntityStore) {
        store.clear();
        let p = &self.config.player;
        store.add(
            Category::Player,
            p.start,
            Vec2::ZERO,
            p.bounds,
            CustomState::Player { health: p.health },
        );
    }

    /// Consume the tick's one-shot input edges and evaluate phase transitions
    pub fn process_input(
        &mut self,
        edges: &InputEdges,
        store: &mut EntityStore,
        events: &mut Vec<GameEvent>,
    ) {
        match self.phase {
            GamePhase::Ready => {
                if edges.start {
                    self.transition(GamePhase::Playing, events);
                }
            }
            GamePhase::Playing => {
                if edges.pause {
                    self.transition(GamePhase::Paused, events);
                }
            }
            GamePhase::Paused => {
                if edges.pause {
                    self.transition(GamePhase::Playing, events);
                }
            }
            GamePhase::GameOver | GamePhase::Victory => {
                if edges.restart {
                    self.reset(store);
                    self.transition(GamePhase::Ready, events);
                }
            }
        }
    }

    /// Rule pass for one playing tick: reactions, spawning, win/lose guards
    pub fn run_tick(
        &mut self,
        store: &mut EntityStore,
        collisions: &[CollisionEvent],
        events: &mut Vec<GameEvent>,
    ) {
        debug_assert_eq!(self.phase, GamePhase::Playing);
        self.ticks += 1;

        for event in collisions {
            self.react(store, event, events);
        }

        self.run_spawners();
        self.flush_pending(store, events);

        if let Some(player) = store.player() {
            self.best_distance = self.best_distance.max(player.pos.x - self.player_start_x);
        }

        self.evaluate_guards(store, events);
    }

    /// Apply the reaction for one collision event
    ///
    /// The same pair may arrive more than once when configured under several
    /// rules; the alive checks make every reaction idempotent, and a reaction
    /// whose entity is already gone is silently dropped.
    fn react(
        &mut self,
        store: &mut EntityStore,
        event: &CollisionEvent,
        events: &mut Vec<GameEvent>,
    ) {
        let pair = event.categories;
        match pair {
            (Category::Player, Category::Obstacle) | (Category::Obstacle, Category::Player) => {
                let (player_id, obstacle_id) = ordered(event, Category::Player);
                let Some(damage) = obstacle_damage(store, obstacle_id) else {
                    return;
                };
                if store.get(player_id).is_none() {
                    return;
                }
                store.remove(obstacle_id);
                events.push(GameEvent::Collision { categories: pair });
                if let Some(player) = store.get_mut(player_id)
                    && let CustomState::Player { ref mut health } = player.custom
                {
                    *health -= damage;
                    events.push(GameEvent::Damage { remaining_health: *health });
                }
            }
            (Category::Player, Category::Collectible)
            | (Category::Collectible, Category::Player) => {
                let (player_id, collectible_id) = ordered(event, Category::Player);
                if store.get(player_id).is_none() {
                    return;
                }
                let Some(value) = collectible_value(store, collectible_id) else {
                    return;
                };
                store.remove(collectible_id);
                self.add_score(u64::from(value), events);
            }
            (Category::Projectile, Category::Obstacle)
            | (Category::Obstacle, Category::Projectile) => {
                let (projectile_id, obstacle_id) = ordered(event, Category::Projectile);
                if store.get(projectile_id).is_none() {
                    return;
                }
                let Some(bounty) = obstacle_bounty(store, obstacle_id) else {
                    return;
                };
                store.remove(projectile_id);
                store.remove(obstacle_id);
                events.push(GameEvent::Collision { categories: pair });
                self.add_score(u64::from(bounty), events);
            }
            _ => {
                // Unconfigured pair semantics: report the contact, change nothing
                if store.get(event.a).is_some() && store.get(event.b).is_some() {
                    events.push(GameEvent::Collision { categories: pair });
                }
            }
        }
    }

    fn add_score(&mut self, gained: u64, events: &mut Vec<GameEvent>) {
        if gained == 0 {
            return;
        }
        self.score += gained;
        events.push(GameEvent::Score { gained, total: self.score });
    }

    /// Interval spawners: a pure function of tick count, score and the RNG
    fn run_spawners(&mut self) {
        for index in 0..self.config.spawns.len() {
            let interval = self.config.spawns[index].interval_at(self.score);
            if self.ticks - self.last_spawn_tick[index] < interval {
                continue;
            }
            self.last_spawn_tick[index] = self.ticks;

            let rule = &self.config.spawns[index];
            let (bounds, category, custom) = (rule.bounds, rule.category, rule.custom);
            let (pos_min, pos_max) = (rule.pos_min, rule.pos_max);
            let (vel_min, vel_max) = (rule.vel_min, rule.vel_max);
            let pos = Vec2::new(
                jitter(&mut self.rng, pos_min.x, pos_max.x),
                jitter(&mut self.rng, pos_min.y, pos_max.y),
            );
            let vel = Vec2::new(
                jitter(&mut self.rng, vel_min.x, vel_max.x),
                jitter(&mut self.rng, vel_min.y, vel_max.y),
            );
            self.pending.push(PendingSpawn { category, pos, vel, bounds, custom });
        }
    }

    /// Add queued spawns to the store, after all passes have run
    fn flush_pending(&mut self, store: &mut EntityStore, events: &mut Vec<GameEvent>) {
        for spawn in self.pending.drain(..) {
            store.add(spawn.category, spawn.pos, spawn.vel, spawn.bounds, spawn.custom);
            if spawn.category == Category::Collectible {
                self.collectibles_spawned += 1;
            }
            events.push(GameEvent::Spawned { category: spawn.category });
        }
    }

    /// Terminal and win guards, evaluated once per tick after all mutations
    fn evaluate_guards(&mut self, store: &EntityStore, events: &mut Vec<GameEvent>) {
        let player_gone = match store.player() {
            // Out-of-bounds culling of the player is fatal
            None => true,
            Some(p) => matches!(p.custom, CustomState::Player { health } if health <= 0),
        };
        if player_gone {
            events.push(GameEvent::GameOver { score: self.score });
            self.transition(GamePhase::GameOver, events);
            return;
        }

        let won = match self.config.win {
            WinCondition::Endless => false,
            WinCondition::CollectAll => {
                self.collectibles_spawned > 0
                    && store.count_category(Category::Collectible) == 0
            }
            WinCondition::DistanceReached(target) => self.best_distance >= target,
        };
        if won {
            events.push(GameEvent::Victory { score: self.score });
            self.transition(GamePhase::Victory, events);
        }
    }

    fn transition(&mut self, to: GamePhase, events: &mut Vec<GameEvent>) {
        if self.phase == to {
            return;
        }
        log::info!("phase {} -> {}", self.phase.as_str(), to.as_str());
        events.push(GameEvent::PhaseChanged { from: self.phase, to });
        self.phase = to;
    }

    /// Rebuild the world for a fresh run after restart
    ///
    /// The RNG is re-derived from the session seed and the restart count, so a
    /// restarted session is still a pure function of config and input.
    fn reset(&mut self, store: &mut EntityStore) {
        self.restart_count += 1;
        self.rng = Pcg32::seed_from_u64(self.config.seed ^ self.restart_count);
        self.score = 0;
        self.ticks = 0;
        self.best_distance = 0.0;
        self.collectibles_spawned = 0;
        self.last_spawn_tick = vec![0; self.config.spawns.len()];
        self.pending.clear();
        self.populate(store);
        log::info!("session reset (restart #{})", self.restart_count);
    }
}

/// Resolve which event side carries `first`, assuming the pair contains it
fn ordered(event: &CollisionEvent, first: Category) -> (EntityId, EntityId) {
    if event.categories.0 == first {
        (event.a, event.b)
    } else {
        (event.b, event.a)
    }
}

fn obstacle_damage(store: &EntityStore, id: EntityId) -> Option<i32> {
    match store.get(id)?.custom {
        CustomState::Obstacle { damage, .. } => Some(damage),
        _ => None,
    }
}

fn obstacle_bounty(store: &EntityStore, id: EntityId) -> Option<u32> {
    match store.get(id)?.custom {
        CustomState::Obstacle { bounty, .. } => Some(bounty),
        _ => None,
    }
}

fn collectible_value(store: &EntityStore, id: EntityId) -> Option<u32> {
    match store.get(id)?.custom {
        CustomState::Collectible { value } => Some(value),
        _ => None,
    }
}

/// Sample uniformly from [min, max), or return min for a degenerate range
///
/// Only touches the RNG for real ranges, so configs with fixed spawn points
/// draw the same value stream as hand-rolled replays expect.
fn jitter(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min { rng.random_range(min..max) } else { min }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(config: GameConfig) -> (RuleEngine, EntityStore) {
        let mut engine = RuleEngine::new(config);
        let mut store = EntityStore::new();
        engine.populate(&mut store);
        (engine, store)
    }

    fn start(engine: &mut RuleEngine, store: &mut EntityStore) {
        let mut events = Vec::new();
        let edges = InputEdges { start: true, ..Default::default() };
        engine.process_input(&edges, store, &mut events);
        assert_eq!(engine.phase(), GamePhase::Playing);
    }

    fn add_obstacle(store: &mut EntityStore, damage: i32) -> EntityId {
        store.add(
            Category::Obstacle,
            Vec2::new(200.0, 200.0),
            Vec2::ZERO,
            Bounds::Aabb { half: Vec2::splat(8.0) },
            CustomState::Obstacle { damage, bounty: 15 },
        )
    }

    fn hit(store: &EntityStore, a: EntityId, b: EntityId) -> CollisionEvent {
        CollisionEvent {
            a,
            b,
            categories: (
                store.get(a).unwrap().category,
                store.get(b).unwrap().category,
            ),
        }
    }

    #[test]
    fn test_lethal_hit_transitions_to_gameover() {
        let mut config = GameConfig::default();
        config.player.health = 1;
        let (mut engine, mut store) = engine_with(config);
        start(&mut engine, &mut store);

        let player = store.player().unwrap().id;
        let obstacle = add_obstacle(&mut store, 1);
        let collision = hit(&store, player, obstacle);

        let mut events = Vec::new();
        engine.run_tick(&mut store, &[collision], &mut events);

        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
        // The obstacle despawned with the hit
        assert!(store.get(obstacle).is_none());
    }

    #[test]
    fn test_duplicate_events_despawn_once() {
        let mut config = GameConfig::default();
        config.player.health = 5;
        let (mut engine, mut store) = engine_with(config);
        start(&mut engine, &mut store);

        let player = store.player().unwrap().id;
        let obstacle = add_obstacle(&mut store, 1);
        let collision = hit(&store, player, obstacle);

        // Two rules reported the same pair this tick
        let mut events = Vec::new();
        engine.run_tick(&mut store, &[collision, collision], &mut events);

        let player_health = match store.player().unwrap().custom {
            CustomState::Player { health } => health,
            _ => unreachable!(),
        };
        assert_eq!(player_health, 4, "second event must be dropped");
    }

    #[test]
    fn test_collect_all_victory() {
        let mut config = GameConfig::default();
        config.win = WinCondition::CollectAll;
        config.spawns.push(crate::config::SpawnRule {
            category: Category::Collectible,
            bounds: Bounds::Circle { radius: 6.0 },
            custom: CustomState::Collectible { value: 10 },
            pos_min: Vec2::new(300.0, 100.0),
            pos_max: Vec2::new(300.0, 100.0),
            vel_min: Vec2::ZERO,
            vel_max: Vec2::ZERO,
            start_interval_ticks: 1,
            min_interval_ticks: 1,
            shrink_per_point: 0,
        });
        let (mut engine, mut store) = engine_with(config);
        start(&mut engine, &mut store);

        // Tick 1 spawns a collectible; no victory while it is alive
        let mut events = Vec::new();
        engine.run_tick(&mut store, &[], &mut events);
        store.compact();
        assert_eq!(engine.phase(), GamePhase::Playing);
        let collectible = store.iter_category(Category::Collectible).next().unwrap().id;

        // Collect it; the same tick spawns another, so still playing
        let player = store.player().unwrap().id;
        let collision = hit(&store, player, collectible);
        let mut events = Vec::new();
        engine.run_tick(&mut store, &[collision], &mut events);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Score { gained: 10, .. })));
    }

    #[test]
    fn test_distance_victory() {
        let mut config = GameConfig::default();
        config.win = WinCondition::DistanceReached(50.0);
        let (mut engine, mut store) = engine_with(config);
        start(&mut engine, &mut store);

        let player = store.player().unwrap().id;
        store.get_mut(player).unwrap().pos.x += 60.0;

        let mut events = Vec::new();
        engine.run_tick(&mut store, &[], &mut events);
        assert_eq!(engine.phase(), GamePhase::Victory);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Victory { .. })));
    }

    #[test]
    fn test_spawner_respects_interval_and_difficulty() {
        let mut config = GameConfig::default();
        config.spawns.push(crate::config::SpawnRule {
            category: Category::Obstacle,
            bounds: Bounds::Aabb { half: Vec2::splat(8.0) },
            custom: CustomState::Obstacle { damage: 1, bounty: 0 },
            pos_min: Vec2::new(800.0, 100.0),
            pos_max: Vec2::new(800.0, 400.0),
            vel_min: Vec2::new(-200.0, 0.0),
            vel_max: Vec2::new(-150.0, 0.0),
            start_interval_ticks: 10,
            min_interval_ticks: 2,
            shrink_per_point: 0,
        });
        let (mut engine, mut store) = engine_with(config);
        start(&mut engine, &mut store);

        let mut events = Vec::new();
        for _ in 0..25 {
            engine.run_tick(&mut store, &[], &mut events);
        }
        // Spawns at ticks 10 and 20
        assert_eq!(store.count_category(Category::Obstacle), 2);
    }

    #[test]
    fn test_state_machine_closure() {
        let (mut engine, mut store) = engine_with(GameConfig::default());
        let mut events = Vec::new();

        // Pause/restart do nothing from ready
        let edges = InputEdges { pause: true, restart: true, ..Default::default() };
        engine.process_input(&edges, &mut store, &mut events);
        assert_eq!(engine.phase(), GamePhase::Ready);

        // ready -> playing -> paused -> playing
        let edges = InputEdges { start: true, ..Default::default() };
        engine.process_input(&edges, &mut store, &mut events);
        assert_eq!(engine.phase(), GamePhase::Playing);
        let edges = InputEdges { pause: true, ..Default::default() };
        engine.process_input(&edges, &mut store, &mut events);
        assert_eq!(engine.phase(), GamePhase::Paused);
        // start does not resume a paused game
        let edges = InputEdges { start: true, ..Default::default() };
        engine.process_input(&edges, &mut store, &mut events);
        assert_eq!(engine.phase(), GamePhase::Paused);
        let edges = InputEdges { pause: true, ..Default::default() };
        engine.process_input(&edges, &mut store, &mut events);
        assert_eq!(engine.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_restart_resets_score_and_world() {
        let mut config = GameConfig::default();
        config.player.health = 1;
        let (mut engine, mut store) = engine_with(config);
        start(&mut engine, &mut store);

        let player = store.player().unwrap().id;
        let obstacle = add_obstacle(&mut store, 1);
        let collision = hit(&store, player, obstacle);
        let mut events = Vec::new();
        engine.run_tick(&mut store, &[collision], &mut events);
        assert_eq!(engine.phase(), GamePhase::GameOver);

        let edges = InputEdges { restart: true, ..Default::default() };
        engine.process_input(&edges, &mut store, &mut events);
        assert_eq!(engine.phase(), GamePhase::Ready);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.ticks(), 0);
        assert_eq!(store.len(), 1);
        let fresh = store.player().unwrap();
        assert!(matches!(fresh.custom, CustomState::Player { health: 1 }));
        // Fresh IDs, no reuse of the dead player's ID
        assert!(fresh.id > player);
    }
}
