//! Parallax Stroll - side-scrolling landing page simulation
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (scroll, day/night, clouds, coins, player)
//! - `platform`: Browser glue (animation frames, keyboard, viewport)
//! - `tuning`: Data-driven constants, loadable from JSON

pub mod platform;
pub mod sim;
pub mod tuning;

pub use sim::{Engine, EngineEvent, FrameReport, Snapshot};
pub use tuning::{Tuning, TuningError};

/// Simulation configuration constants
pub mod consts {
    /// Nominal frame length in milliseconds (60 FPS baseline = 1.0 delta unit)
    pub const FRAME_MS: f64 = 16.67;
    /// Upper bound on delta units for one frame (tab-suspend guard)
    pub const MAX_DELTA_UNITS: f32 = 5.0;

    /// Viewport fallback when the host reports unusable dimensions
    pub const DEFAULT_SCREEN_WIDTH: f32 = 1920.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 1080.0;
}

/// Screen dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: consts::DEFAULT_SCREEN_WIDTH,
            height: consts::DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl Viewport {
    /// Build a viewport, replacing zero/negative/NaN sides with the defaults
    pub fn sanitized(width: f32, height: f32) -> Self {
        let fallback = Self::default();
        let width = if width.is_finite() && width > 0.0 {
            width
        } else {
            log::warn!("Unusable screen width {width}, using {}", fallback.width);
            fallback.width
        };
        let height = if height.is_finite() && height > 0.0 {
            height
        } else {
            log::warn!("Unusable screen height {height}, using {}", fallback.height);
            fallback.height
        };
        Self { width, height }
    }

    /// Vertical start/end of the celestial arc (half the screen height)
    #[inline]
    pub fn horizon_y(&self) -> f32 {
        self.height / 2.0
    }
}

/// Linear step toward `target` by `factor` (0 = hold, 1 = snap)
#[inline]
pub fn ease_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}
