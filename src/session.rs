//! Game session
//!
//! One `GameSession` per play session: it owns the clock, the entity store and
//! the rule engine, and runs every simulation tick for a frame to completion
//! before handing the frame's snapshot to the registered renderer. Nothing in
//! here suspends mid-tick; the host's frame callback is the only scheduler.

use crate::audio::{GameEvent, SoundSink};
use crate::config::{ConfigError, GameConfig};
use crate::input::{InputAction, InputState};
use crate::render::Renderer;
use crate::sim::{
    Clock, ControlState, EntityStore, GamePhase, RuleEngine, Snapshot, collision_pass,
    physics_pass,
};

/// A running game instance
pub struct GameSession {
    config: GameConfig,
    clock: Clock,
    store: EntityStore,
    rules: RuleEngine,
    input: InputState,
    renderer: Option<Box<dyn Renderer>>,
    sink: Option<Box<dyn SoundSink>>,
    events: Vec<GameEvent>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("store", &self.store)
            .field("rules", &self.rules)
            .field("input", &self.input)
            .field("renderer", &self.renderer.as_ref().map(|_| "..."))
            .field("sink", &self.sink.as_ref().map(|_| "..."))
            .field("events", &self.events)
            .finish()
    }
}

impl GameSession {
    /// Build a session from a validated config
    ///
    /// Config validation is the only fallible part of startup; everything
    /// after this constructor runs without errors.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "session start: step={:.4}s cap={} seed={}",
            config.fixed_step_seconds,
            config.max_ticks_per_frame,
            config.seed,
        );

        let clock = Clock::new(
            config.fixed_step_seconds,
            config.max_ticks_per_frame,
            config.max_frame_delta,
        );
        let mut rules = RuleEngine::new(config.clone());
        let mut store = EntityStore::new();
        rules.populate(&mut store);

        Ok(Self {
            config,
            clock,
            store,
            rules,
            input: InputState::default(),
            renderer: None,
            sink: None,
            events: Vec::new(),
        })
    }

    /// Register the render collaborator
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = Some(renderer);
    }

    /// Register the audio collaborator
    pub fn set_sound_sink(&mut self, sink: Box<dyn SoundSink>) {
        self.sink = Some(sink);
    }

    /// Feed a press/release edge for a named action; unknown names are no-ops
    pub fn handle_input(&mut self, action: &str, pressed: bool) {
        match InputAction::from_name(action) {
            Some(action) => self.input.apply(action, pressed),
            None => log::debug!("ignoring unknown input action {action:?}"),
        }
    }

    /// Typed variant of [`handle_input`](Self::handle_input)
    pub fn apply_action(&mut self, action: InputAction, pressed: bool) {
        self.input.apply(action, pressed);
    }

    pub fn phase(&self) -> GamePhase {
        self.rules.phase()
    }

    pub fn score(&self) -> u64 {
        self.rules.score()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Advance by one frame delta, then snapshot
    ///
    /// Runs zero or more fixed ticks depending on accumulated time, each one
    /// to completion: physics, collisions, rules, compaction. The snapshot is
    /// taken after all ticks, so a dropped render frame just means the next
    /// snapshot reflects more elapsed ticks.
    pub fn frame(&mut self, frame_delta: f32) -> Snapshot {
        let ticks = self.clock.advance(frame_delta);
        for _ in 0..ticks {
            self.tick();
        }

        let snapshot = Snapshot::capture(&self.store, &self.rules);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&snapshot);
        }
        snapshot
    }

    /// One fixed simulation step
    fn tick(&mut self) {
        let edges = self.input.take_edges();
        self.rules.process_input(&edges, &mut self.store, &mut self.events);

        if self.rules.phase() == GamePhase::Playing {
            let control = ControlState {
                move_axis: self.input.move_axis(),
                jump: edges.jump,
            };
            let dt = self.clock.step();

            physics_pass(&mut self.store, &self.config, control, dt);
            let collisions = collision_pass(&self.store, &self.config.interactions);
            self.rules.run_tick(&mut self.store, &collisions, &mut self.events);
        }

        // Dead entities never survive into the next tick's passes
        self.store.compact();

        if let Some(sink) = self.sink.as_mut() {
            for event in self.events.drain(..) {
                sink.on_event(&event);
            }
        } else {
            self.events.clear();
        }
    }
}
