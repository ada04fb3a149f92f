//! Input actions and per-tick input state
//!
//! The core is agnostic to input devices: the host maps keys, pointers or
//! gamepads onto named actions and feeds press/release edges in. Unknown
//! action names are ignored, never fatal.
//!
//! Held actions (movement) persist until released. One-shot actions (start,
//! pause, restart, jump) latch on press and are consumed by the first tick
//! that observes them, so a press between frames is never lost and never
//! double-fires.

use serde::{Deserialize, Serialize};

/// Named input actions understood by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    Start,
    Pause,
    Restart,
}

impl InputAction {
    /// Parse an action name; `None` for anything unrecognized
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "move_left" => Some(InputAction::MoveLeft),
            "move_right" => Some(InputAction::MoveRight),
            "jump" => Some(InputAction::Jump),
            "start" => Some(InputAction::Start),
            "pause" => Some(InputAction::Pause),
            "restart" => Some(InputAction::Restart),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputAction::MoveLeft => "move_left",
            InputAction::MoveRight => "move_right",
            InputAction::Jump => "jump",
            InputAction::Start => "start",
            InputAction::Pause => "pause",
            InputAction::Restart => "restart",
        }
    }
}

/// One-shot edges consumed by a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputEdges {
    pub start: bool,
    pub pause: bool,
    pub restart: bool,
    pub jump: bool,
}

/// Accumulated input between frames
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    left_held: bool,
    right_held: bool,
    start_pressed: bool,
    pause_pressed: bool,
    restart_pressed: bool,
    jump_pressed: bool,
}

impl InputState {
    /// Apply a press/release edge for an action
    pub fn apply(&mut self, action: InputAction, pressed: bool) {
        match action {
            InputAction::MoveLeft => self.left_held = pressed,
            InputAction::MoveRight => self.right_held = pressed,
            // One-shots latch on press only; release is not an event
            InputAction::Jump => self.jump_pressed |= pressed,
            InputAction::Start => self.start_pressed |= pressed,
            InputAction::Pause => self.pause_pressed |= pressed,
            InputAction::Restart => self.restart_pressed |= pressed,
        }
    }

    /// Horizontal movement axis in [-1, 1]
    pub fn move_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.left_held {
            axis -= 1.0;
        }
        if self.right_held {
            axis += 1.0;
        }
        axis
    }

    /// Take the pending one-shot edges, clearing them
    pub(crate) fn take_edges(&mut self) -> InputEdges {
        let edges = InputEdges {
            start: self.start_pressed,
            pause: self.pause_pressed,
            restart: self.restart_pressed,
            jump: self.jump_pressed,
        };
        self.start_pressed = false;
        self.pause_pressed = false;
        self.restart_pressed = false;
        self.jump_pressed = false;
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_names_parse_to_none() {
        assert_eq!(InputAction::from_name("warp_drive"), None);
        assert_eq!(InputAction::from_name(""), None);
        assert_eq!(InputAction::from_name("jump"), Some(InputAction::Jump));
    }

    #[test]
    fn test_name_round_trip() {
        for action in [
            InputAction::MoveLeft,
            InputAction::MoveRight,
            InputAction::Jump,
            InputAction::Start,
            InputAction::Pause,
            InputAction::Restart,
        ] {
            assert_eq!(InputAction::from_name(action.name()), Some(action));
        }
    }

    #[test]
    fn test_one_shots_consumed_once() {
        let mut input = InputState::default();
        input.apply(InputAction::Pause, true);
        input.apply(InputAction::Pause, false);

        assert!(input.take_edges().pause);
        assert!(!input.take_edges().pause);
    }

    #[test]
    fn test_held_actions_survive_edge_taking() {
        let mut input = InputState::default();
        input.apply(InputAction::MoveRight, true);
        let _ = input.take_edges();
        assert_eq!(input.move_axis(), 1.0);

        input.apply(InputAction::MoveLeft, true);
        assert_eq!(input.move_axis(), 0.0);
        input.apply(InputAction::MoveRight, false);
        assert_eq!(input.move_axis(), -1.0);
    }
}
