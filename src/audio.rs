//! Sound events and the audio collaborator boundary
//!
//! The simulation emits named gameplay events; everything about sound (timing,
//! synthesis, mixing) belongs to the collaborator behind [`SoundSink`]. For
//! hosts that want delayed cues, [`SoundQueue`] is a small cooperative
//! scheduler drained by the host's own timing loop; the simulation core never
//! consults it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::sim::{Category, GamePhase};

/// A named gameplay event, fired synchronously as the rule engine produces it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    Collision { categories: (Category, Category) },
    Score { gained: u64, total: u64 },
    Damage { remaining_health: i32 },
    Spawned { category: Category },
    GameOver { score: u64 },
    Victory { score: u64 },
}

impl GameEvent {
    /// Stable event name for sinks keyed by string
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PhaseChanged { .. } => "phase_changed",
            GameEvent::Collision { .. } => "collision",
            GameEvent::Score { .. } => "score",
            GameEvent::Damage { .. } => "damage",
            GameEvent::Spawned { .. } => "spawned",
            GameEvent::GameOver { .. } => "gameover",
            GameEvent::Victory { .. } => "victory",
        }
    }
}

/// Audio collaborator capability
///
/// Implementations own all sound-timing concerns and must not assume any
/// relationship between event cadence and wall-clock frame rate.
pub trait SoundSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Sink that swallows everything; the default when no audio is wired up
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn on_event(&mut self, _event: &GameEvent) {}
}

#[derive(Debug, Clone, Copy)]
struct QueuedCue {
    fire_at: f64,
    sequence: u64,
    event: GameEvent,
}

// Min-heap on fire time; insertion order breaks ties
impl Ord for QueuedCue {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then(other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueuedCue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedCue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedCue {}

/// Host-side scheduler for delayed sound cues
///
/// A priority queue of `(fire_at, event)` entries. The host pushes cues with
/// its own notion of time and drains due ones from its own timing loop,
/// replacing the self-rescheduling timer chains such code usually grows.
#[derive(Debug, Default)]
pub struct SoundQueue {
    heap: BinaryHeap<QueuedCue>,
    sequence: u64,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event to fire at the given host time
    pub fn schedule(&mut self, fire_at: f64, event: GameEvent) {
        let sequence = self.sequence;
        self.sequence += 1;
        self.heap.push(QueuedCue { fire_at, sequence, event });
    }

    /// Pop every cue due at or before `now`, in fire-time order
    pub fn drain_due(&mut self, now: f64) -> Vec<GameEvent> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|cue| cue.fire_at <= now) {
            if let Some(cue) = self.heap.pop() {
                due.push(cue.event);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
