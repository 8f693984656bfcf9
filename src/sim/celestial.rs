//! Sun/moon arc and the apex flip guard
//!
//! The distant position loops through `screen_width + body_size`. Within that
//! range the body follows a downward-opening parabola in screen space (y grows
//! downward): `horizon_y` at both ends, `peak` at the screen midpoint. Outside
//! the visible width the parabola is clamped to the horizon, which is where the
//! sun and moon trade places.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{CelestialBody, Direction, EngineEvent};
use crate::tuning::CelestialTuning;
use crate::Viewport;

/// Length of one arc loop in distant units
fn loop_span(viewport: Viewport, tuning: &CelestialTuning) -> f32 {
    Viewport::sanitized(viewport.width, viewport.height).width + tuning.body_size.max(0.0)
}

/// Map a distant position onto the looping parabolic arc. Returns the screen
/// position of the body's leading edge. Pure.
pub fn compute_arc(distant_position: f32, viewport: Viewport, tuning: &CelestialTuning) -> Vec2 {
    let vp = Viewport::sanitized(viewport.width, viewport.height);
    let span = loop_span(vp, tuning);
    let distant = if distant_position.is_finite() { distant_position } else { 0.0 };

    let x = distant.rem_euclid(span);
    let h = vp.width / 2.0;
    let start_y = vp.horizon_y();
    let peak_y = start_y * tuning.peak_fraction.clamp(-1.0, 1.0);
    let a = (start_y - peak_y) / (h * h);

    let y = (a * (x - h).powi(2) + peak_y).clamp(-start_y, start_y);
    Vec2::new(x, y)
}

/// Hysteresis state for the sun/moon toggle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipGuard {
    pub has_flipped_at_apex: bool,
    pub direction_at_flip: Direction,
}

/// Current celestial position plus the active body and its flip guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelestialState {
    pub position: Vec2,
    pub active_body: CelestialBody,
    pub guard: FlipGuard,
    /// Loop length the position was computed with
    #[serde(skip)]
    span: f32,
}

impl CelestialState {
    /// Start with the sun at `distant_position`. If that point is already on
    /// the horizon the guard is armed so the first frame does not flip.
    pub fn new(distant_position: f32, viewport: Viewport, tuning: &CelestialTuning) -> Self {
        let position = compute_arc(distant_position, viewport, tuning);
        let at_extreme = is_at_extreme(position, viewport, tuning);
        Self {
            position,
            active_body: CelestialBody::Sun,
            guard: FlipGuard {
                has_flipped_at_apex: at_extreme,
                direction_at_flip: Direction::Unknown,
            },
            span: loop_span(viewport, tuning),
        }
    }

    /// Recompute the arc and run the flip rule once.
    ///
    /// A frame that crosses the loop seam counts as reaching the extreme even
    /// when the step jumped over the clamped band.
    pub fn update(
        &mut self,
        distant_position: f32,
        direction: Direction,
        viewport: Viewport,
        tuning: &CelestialTuning,
    ) -> Option<EngineEvent> {
        let previous_x = self.position.x;
        let span = loop_span(viewport, tuning);
        self.position = compute_arc(distant_position, viewport, tuning);

        // A resize changes the loop length, so only compare like with like
        let crossed_seam = span == self.span && (self.position.x - previous_x).abs() > span / 2.0;
        self.span = span;

        let at_extreme = crossed_seam || is_at_extreme(self.position, viewport, tuning);
        self.apply_flip_rule(at_extreme, direction)
    }

    /// Toggle once on reaching the extreme; toggle back on every reversal
    /// while still there; re-arm once the body leaves.
    pub fn apply_flip_rule(&mut self, at_extreme: bool, direction: Direction) -> Option<EngineEvent> {
        if !at_extreme {
            self.guard.has_flipped_at_apex = false;
            return None;
        }

        if !self.guard.has_flipped_at_apex {
            self.guard.has_flipped_at_apex = true;
            self.guard.direction_at_flip = direction;
            return Some(self.toggle());
        }

        if self.guard.direction_at_flip.is_reversal_of(direction) {
            self.guard.direction_at_flip = direction;
            return Some(self.toggle());
        }

        None
    }

    fn toggle(&mut self) -> EngineEvent {
        self.active_body = self.active_body.toggled();
        log::info!("{:?} is now up", self.active_body);
        EngineEvent::CelestialFlipped { body: self.active_body }
    }
}

fn is_at_extreme(p: Vec2, viewport: Viewport, tuning: &CelestialTuning) -> bool {
    let start_y = Viewport::sanitized(viewport.width, viewport.height).horizon_y();
    p.y >= start_y - tuning.apex_epsilon.max(0.0)
}
