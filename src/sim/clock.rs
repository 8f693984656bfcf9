//! Frame clock
//!
//! Turns host timestamps into normalized delta units (1.0 = one 60 FPS frame).

/// Per-session ticker; forget the previous timestamp with `reset` whenever
/// motion restarts so an idle gap never becomes one giant step.
#[derive(Debug, Clone)]
pub struct Ticker {
    frame_ms: f64,
    max_units: f32,
    previous: Option<f64>,
}

impl Ticker {
    pub fn new(frame_ms: f64, max_units: f32) -> Self {
        let frame_ms = if frame_ms.is_finite() && frame_ms > 0.0 {
            frame_ms
        } else {
            crate::consts::FRAME_MS
        };
        Self {
            frame_ms,
            max_units: max_units.max(0.0),
            previous: None,
        }
    }

    /// Delta units since the previous tick. The first tick of a run counts as
    /// one nominal frame.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let units = match self.previous {
            None => 1.0,
            Some(prev) => {
                let raw = ((now_ms - prev) / self.frame_ms) as f32;
                if raw.is_finite() {
                    raw.clamp(0.0, self.max_units)
                } else {
                    1.0
                }
            }
        };
        self.previous = Some(now_ms);
        units
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn is_running(&self) -> bool {
        self.previous.is_some()
    }
}
