//! Arcade Core demo
//!
//! Headless endless-runner session: builds a config, drives the loop with
//! synthetic frame deltas and scripted input, routes gameplay events through
//! the sound-sink boundary into a host-side cue queue, and dumps the final
//! snapshot as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use arcade_core::sim::{Bounds, Category, CustomState};
use arcade_core::{
    GameConfig, GameEvent, GameSession, Renderer, Snapshot, SoundQueue, SoundSink, SpawnRule,
    WinCondition,
};

/// Renderer that narrates frames instead of drawing them
struct ConsoleRenderer {
    frames: u64,
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        // One status line per simulated second
        if self.frames % 60 == 0 {
            println!(
                "[{:>5}] phase={:<8} score={:<4} health={} obstacles={} collectibles={}",
                snapshot.hud.ticks,
                snapshot.phase.as_str(),
                snapshot.hud.score,
                snapshot.hud.health,
                snapshot.entities_of(Category::Obstacle).count(),
                snapshot.entities_of(Category::Collectible).count(),
            );
        }
    }
}

/// Sink that schedules every event as a sound cue a beat later
///
/// Stands in for a real audio backend: the simulation hands events over
/// synchronously, the host drains due cues on its own clock.
struct CueSink {
    queue: Rc<RefCell<SoundQueue>>,
    now: Rc<RefCell<f64>>,
}

impl SoundSink for CueSink {
    fn on_event(&mut self, event: &GameEvent) {
        log::debug!("event {}: {event:?}", event.name());
        let fire_at = *self.now.borrow() + 0.25;
        self.queue.borrow_mut().schedule(fire_at, *event);
    }
}

fn demo_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.seed = 0xC0FFEE;
    config.win = WinCondition::Endless;
    config.spawns.push(SpawnRule {
        category: Category::Obstacle,
        bounds: Bounds::Aabb { half: Vec2::new(12.0, 24.0) },
        custom: CustomState::Obstacle { damage: 1, bounty: 15 },
        pos_min: Vec2::new(820.0, 380.0),
        pos_max: Vec2::new(820.0, 420.0),
        vel_min: Vec2::new(-260.0, 0.0),
        vel_max: Vec2::new(-180.0, 0.0),
        start_interval_ticks: 75,
        min_interval_ticks: 25,
        shrink_per_point: 1,
    });
    config.spawns.push(SpawnRule {
        category: Category::Collectible,
        bounds: Bounds::Circle { radius: 7.0 },
        custom: CustomState::Collectible { value: 5 },
        pos_min: Vec2::new(820.0, 120.0),
        pos_max: Vec2::new(820.0, 360.0),
        vel_min: Vec2::new(-200.0, 0.0),
        vel_max: Vec2::new(-200.0, 0.0),
        start_interval_ticks: 120,
        min_interval_ticks: 120,
        shrink_per_point: 0,
    });
    config
}

fn main() {
    env_logger::init();
    log::info!("arcade-core demo starting");

    let mut session = match GameSession::new(demo_config()) {
        Ok(session) => session,
        Err(err) => {
            log::error!("invalid config: {err}");
            std::process::exit(1);
        }
    };

    let cues = Rc::new(RefCell::new(SoundQueue::new()));
    let host_time = Rc::new(RefCell::new(0.0f64));
    session.set_renderer(Box::new(ConsoleRenderer { frames: 0 }));
    session.set_sound_sink(Box::new(CueSink {
        queue: cues.clone(),
        now: host_time.clone(),
    }));

    session.handle_input("start", true);

    // 30 seconds at a steady 60 Hz, hopping every second and a half
    let frame_dt = 1.0 / 60.0;
    let mut last: Option<Snapshot> = None;
    for frame in 0..1800u32 {
        if frame % 90 == 0 {
            session.handle_input("jump", true);
        }
        last = Some(session.frame(frame_dt));

        *host_time.borrow_mut() += f64::from(frame_dt);
        for cue in cues.borrow_mut().drain_due(*host_time.borrow()) {
            log::info!("cue {}", cue.name());
        }
    }

    log::info!("demo over: phase={} score={}", session.phase().as_str(), session.score());
    if let Some(snapshot) = last {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("final snapshot:\n{json}"),
            Err(err) => log::warn!("snapshot dump failed: {err}"),
        }
    }
}
