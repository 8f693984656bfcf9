//! Player state machine
//!
//! Translates logical key presses into persistent motion flags and runs the
//! fixed-length jump. Horizontal input is ignored during the introduction,
//! which ends with the first jump.

use serde::{Deserialize, Serialize};

use super::state::{Direction, EngineEvent, PlayerMotionFlags};
use crate::tuning::PlayerTuning;

/// Logical input actions; the physical key mapping lives in the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    Jump,
    Restart,
}

/// Jump timer state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum JumpPhase {
    #[default]
    Grounded,
    /// Requested between frames; the clock starts on the next frame
    Pending,
    Airborne { started_ms: f64 },
}

#[derive(Debug, Clone)]
pub struct Player {
    flags: PlayerMotionFlags,
    jump: JumpPhase,
    introduction: bool,
    facing: Direction,
    jump_ms: f64,
    jump_height: f32,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            flags: PlayerMotionFlags::default(),
            jump: JumpPhase::Grounded,
            introduction: true,
            facing: Direction::Forward,
            jump_ms: tuning.jump_ms,
            jump_height: tuning.jump_height,
        }
    }

    pub fn key_down(&mut self, action: InputAction, events: &mut Vec<EngineEvent>) {
        match action {
            InputAction::Jump => self.request_jump(events),
            InputAction::MoveForward if !self.introduction => {
                self.flags.moving_forward = true;
                self.flags.moving_backward = false;
                self.facing = Direction::Forward;
            }
            InputAction::MoveBackward if !self.introduction => {
                self.flags.moving_backward = true;
                self.flags.moving_forward = false;
                self.facing = Direction::Backward;
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, action: InputAction) {
        match action {
            InputAction::MoveForward => self.flags.moving_forward = false,
            InputAction::MoveBackward => self.flags.moving_backward = false,
            _ => {}
        }
    }

    /// A second request while airborne is ignored
    fn request_jump(&mut self, events: &mut Vec<EngineEvent>) {
        if self.jump != JumpPhase::Grounded {
            return;
        }
        self.jump = JumpPhase::Pending;
        self.flags.jumping = true;
        events.push(EngineEvent::JumpStarted);

        if self.introduction {
            self.introduction = false;
            log::info!("Introduction finished, movement enabled");
            events.push(EngineEvent::IntroductionFinished);
        }
    }

    /// Advance the jump timer to `now_ms`
    pub fn update(&mut self, now_ms: f64, events: &mut Vec<EngineEvent>) {
        match self.jump {
            JumpPhase::Pending => {
                self.jump = JumpPhase::Airborne { started_ms: now_ms };
            }
            JumpPhase::Airborne { started_ms } if now_ms - started_ms >= self.jump_ms => {
                self.jump = JumpPhase::Grounded;
                self.flags.jumping = false;
                events.push(EngineEvent::JumpLanded);
            }
            _ => {}
        }
    }

    /// Upward offset of the sprite at `now_ms` (parabolic, 0 on the ground)
    pub fn vertical_offset(&self, now_ms: f64) -> f32 {
        match self.jump {
            JumpPhase::Airborne { started_ms } => {
                let t = ((now_ms - started_ms) / self.jump_ms).clamp(0.0, 1.0) as f32;
                self.jump_height * 4.0 * t * (1.0 - t)
            }
            _ => 0.0,
        }
    }

    /// Drop held keys and any jump in flight (teardown)
    pub fn cancel(&mut self) {
        self.flags = PlayerMotionFlags::default();
        self.jump = JumpPhase::Grounded;
    }

    pub fn flags(&self) -> PlayerMotionFlags {
        self.flags
    }

    pub fn jump_phase(&self) -> JumpPhase {
        self.jump
    }

    pub fn in_introduction(&self) -> bool {
        self.introduction
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&PlayerTuning::default())
    }

    #[test]
    fn test_introduction_blocks_movement_until_first_jump() {
        let mut p = player();
        let mut events = Vec::new();
        p.key_down(InputAction::MoveForward, &mut events);
        assert!(!p.flags().moving_forward);

        p.key_down(InputAction::Jump, &mut events);
        assert!(!p.in_introduction());
        assert_eq!(events, vec![EngineEvent::JumpStarted, EngineEvent::IntroductionFinished]);

        p.key_down(InputAction::MoveForward, &mut events);
        assert!(p.flags().moving_forward);
    }

    #[test]
    fn test_opposite_key_clears_other_flag() {
        let mut p = player();
        let mut events = Vec::new();
        p.key_down(InputAction::Jump, &mut events);
        p.key_down(InputAction::MoveForward, &mut events);
        p.key_down(InputAction::MoveBackward, &mut events);
        assert!(!p.flags().moving_forward);
        assert!(p.flags().moving_backward);
        assert_eq!(p.facing(), Direction::Backward);

        p.key_up(InputAction::MoveBackward);
        assert!(!p.flags().is_moving());
        // Facing is remembered after release
        assert_eq!(p.facing(), Direction::Backward);
    }

    #[test]
    fn test_jump_times_out_and_ignores_repeat() {
        let mut p = player();
        let mut events = Vec::new();
        p.key_down(InputAction::Jump, &mut events);
        p.update(1000.0, &mut events);
        assert_eq!(p.jump_phase(), JumpPhase::Airborne { started_ms: 1000.0 });

        events.clear();
        p.key_down(InputAction::Jump, &mut events);
        assert!(events.is_empty());

        p.update(1499.0, &mut events);
        assert!(p.flags().jumping);
        p.update(1500.0, &mut events);
        assert!(!p.flags().jumping);
        assert_eq!(events, vec![EngineEvent::JumpLanded]);

        // Grounded again, so a new jump is accepted
        p.key_down(InputAction::Jump, &mut events);
        assert!(p.flags().jumping);
    }

    #[test]
    fn test_vertical_offset_arc() {
        let mut p = player();
        let mut events = Vec::new();
        assert_eq!(p.vertical_offset(0.0), 0.0);
        p.key_down(InputAction::Jump, &mut events);
        p.update(0.0, &mut events);
        let peak = p.vertical_offset(250.0);
        assert!((peak - PlayerTuning::default().jump_height).abs() < 1e-3);
        assert!(p.vertical_offset(100.0) < peak);
        assert_eq!(p.vertical_offset(500.0), 0.0);
    }

    #[test]
    fn test_cancel_clears_everything() {
        let mut p = player();
        let mut events = Vec::new();
        p.key_down(InputAction::Jump, &mut events);
        p.key_down(InputAction::MoveForward, &mut events);
        p.cancel();
        assert_eq!(p.flags(), PlayerMotionFlags::default());
        assert_eq!(p.jump_phase(), JumpPhase::Grounded);
    }
}
