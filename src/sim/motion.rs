//! Motion integrator and the self-suspending motion loop
//!
//! The loop only runs while a movement flag is held. Starting it again
//! resets the ticker so the first frame after an idle gap is a nominal one.

use super::clock::Ticker;
use super::state::{Direction, EngineEvent, PlayerMotionFlags, ScrollState};
use crate::tuning::MotionTuning;

/// Signed per-frame deltas produced by one `advance`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionStep {
    pub scroll: f32,
    pub distant: f32,
    pub cloud: f32,
    /// Delta units actually applied (after the speed floor)
    pub units: f32,
}

/// Advances the world scroll state from input flags and elapsed time
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    base_speed: f32,
    parallax_ratio: f32,
    cloud_speed: f32,
    min_step: f32,
    state: ScrollState,
    last_step: MotionStep,
}

impl MotionIntegrator {
    pub fn new(tuning: &MotionTuning) -> Self {
        Self {
            base_speed: tuning.base_speed,
            parallax_ratio: tuning.parallax_ratio,
            cloud_speed: tuning.cloud_speed,
            min_step: tuning.min_step,
            state: ScrollState::default(),
            last_step: MotionStep::default(),
        }
    }

    /// Deltas for one frame in `direction`, without mutating anything
    pub fn step_for(&self, direction: Direction, delta_units: f32) -> MotionStep {
        let sign = direction.world_sign();
        if sign == 0.0 {
            return MotionStep::default();
        }

        let delta_units = if delta_units.is_finite() { delta_units.max(0.0) } else { 0.0 };
        // Speed floor: never crawl below min_step per frame
        let mut units = delta_units;
        if self.base_speed * units < self.min_step {
            units = self.min_step / self.base_speed;
        }

        MotionStep {
            scroll: sign * self.base_speed * units,
            distant: sign * (self.base_speed / self.parallax_ratio) * units,
            cloud: sign * self.cloud_speed * units,
            units,
        }
    }

    /// Apply one frame of motion and return the updated scroll state
    pub fn advance(&mut self, flags: &PlayerMotionFlags, delta_units: f32) -> ScrollState {
        let step = self.step_for(flags.direction(), delta_units);
        self.state.scroll_position += step.scroll;
        self.state.distant_position += step.distant;
        self.state.cloud_drift += step.cloud;
        self.last_step = step;
        self.state
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn last_step(&self) -> MotionStep {
        self.last_step
    }

    /// Cloud drift per delta unit, signed like the scroll
    pub fn cloud_rate(&self, direction: Direction) -> f32 {
        direction.world_sign() * self.cloud_speed
    }
}

/// Tracks whether per-frame motion is scheduled, owning the frame ticker
#[derive(Debug, Clone)]
pub struct MotionLoop {
    ticker: Ticker,
    active: bool,
}

impl MotionLoop {
    pub fn new(tuning: &MotionTuning) -> Self {
        Self {
            ticker: Ticker::new(tuning.frame_ms, tuning.max_delta_units),
            active: false,
        }
    }

    /// Start or stop the loop to match the current flags
    pub fn sync(&mut self, flags: &PlayerMotionFlags) -> Option<EngineEvent> {
        match (flags.is_moving(), self.active) {
            (true, false) => {
                self.ticker.reset();
                self.active = true;
                log::debug!("Motion loop started ({:?})", flags.direction());
                Some(EngineEvent::MotionStarted)
            }
            (false, true) => {
                self.active = false;
                log::debug!("Motion loop stopped");
                Some(EngineEvent::MotionStopped)
            }
            _ => None,
        }
    }

    /// Delta units for this frame; only meaningful while active
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        self.ticker.tick(now_ms)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Cancel without emitting events (teardown)
    pub fn cancel(&mut self) {
        self.active = false;
        self.ticker.reset();
    }
}
