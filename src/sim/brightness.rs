//! Day/night brightness filter
//!
//! A target brightness is derived from the active body's height on the arc,
//! then three channels ease toward it every frame.

use serde::{Deserialize, Serialize};

use super::state::CelestialBody;
use crate::ease_toward;
use crate::tuning::BrightnessTuning;

/// Smoothed brightness channels consumed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrightnessState {
    /// Darkness of the full-screen overlay, 0 = clear
    pub overlay: f32,
    /// Brightness filter applied to the mountain layer
    pub mountain_filter: f32,
    /// Brightness filter applied to clouds
    pub cloud_filter: f32,
}

/// Target brightness for `body` at height `y` on an arc that starts at `start_y`
pub fn target_brightness(body: CelestialBody, y: f32, start_y: f32, tuning: &BrightnessTuning) -> f32 {
    let factor = if start_y.is_finite() && start_y.abs() > f32::EPSILON && y.is_finite() {
        (y / start_y).clamp(-1.0, 1.0)
    } else {
        1.0
    };
    let elevation = 1.0 - factor.abs();
    match body {
        CelestialBody::Sun => tuning.medium_dark + (tuning.bright - tuning.medium_dark) * elevation,
        CelestialBody::Moon => tuning.medium_dark - (tuning.medium_dark - tuning.dark) * elevation,
    }
}

/// Exponential smoothing filter over the three channels
#[derive(Debug, Clone)]
pub struct BrightnessFilter {
    tuning: BrightnessTuning,
    state: BrightnessState,
}

impl BrightnessFilter {
    /// Start settled on the target for the initial body/height
    pub fn new(body: CelestialBody, y: f32, start_y: f32, tuning: &BrightnessTuning) -> Self {
        let target = target_brightness(body, y, start_y, tuning);
        let mut tuning = tuning.clone();
        tuning.smoothing = tuning.smoothing.clamp(f32::EPSILON, 1.0);
        let state = channel_targets(target, &tuning);
        Self { tuning, state }
    }

    /// Ease every channel one frame toward the current target
    pub fn step(&mut self, body: CelestialBody, y: f32, start_y: f32) -> BrightnessState {
        let target = target_brightness(body, y, start_y, &self.tuning);
        let goal = channel_targets(target, &self.tuning);
        let k = self.tuning.smoothing;

        self.state.overlay = ease_toward(self.state.overlay, goal.overlay, k);
        self.state.mountain_filter = ease_toward(self.state.mountain_filter, goal.mountain_filter, k);
        self.state.cloud_filter = ease_toward(self.state.cloud_filter, goal.cloud_filter, k);
        self.state
    }

    pub fn state(&self) -> BrightnessState {
        self.state
    }
}

fn channel_targets(brightness: f32, tuning: &BrightnessTuning) -> BrightnessState {
    BrightnessState {
        overlay: (1.0 - brightness).clamp(0.0, 1.0),
        mountain_filter: brightness.max(0.0),
        cloud_filter: brightness.max(tuning.cloud_floor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_curve() {
        let t = BrightnessTuning::default();
        // Horizon: medium for both bodies
        assert!((target_brightness(CelestialBody::Sun, 400.0, 400.0, &t) - 0.6).abs() < 1e-6);
        assert!((target_brightness(CelestialBody::Moon, 400.0, 400.0, &t) - 0.6).abs() < 1e-6);
        // Peak: bright sun, dark moon
        assert!((target_brightness(CelestialBody::Sun, 0.0, 400.0, &t) - 1.0).abs() < 1e-6);
        assert!((target_brightness(CelestialBody::Moon, 0.0, 400.0, &t) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_zero_start_y_is_safe() {
        let t = BrightnessTuning::default();
        let b = target_brightness(CelestialBody::Sun, 10.0, 0.0, &t);
        assert!(b.is_finite());
    }

    #[test]
    fn test_eases_instead_of_snapping() {
        let t = BrightnessTuning::default();
        let mut f = BrightnessFilter::new(CelestialBody::Sun, 400.0, 400.0, &t);
        let before = f.state();
        assert!((before.mountain_filter - 0.6).abs() < 1e-6);

        let after = f.step(CelestialBody::Sun, 0.0, 400.0);
        // 0.6 + (1.0 - 0.6) * 0.6
        assert!((after.mountain_filter - 0.84).abs() < 1e-5);
        assert!(after.overlay < before.overlay);
        assert!(after.mountain_filter < 1.0);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let t = BrightnessTuning::default();
        let mut f = BrightnessFilter::new(CelestialBody::Sun, 0.0, 400.0, &t);
        let mut prev = f.state().mountain_filter;
        for _ in 0..40 {
            let s = f.step(CelestialBody::Moon, 0.0, 400.0);
            assert!(s.mountain_filter <= prev);
            assert!(s.mountain_filter >= 0.3 - 1e-6);
            prev = s.mountain_filter;
        }
        assert!((prev - 0.3).abs() < 1e-4);
        assert!((f.state().cloud_filter - 0.3).abs() < 1e-4);
    }
}
