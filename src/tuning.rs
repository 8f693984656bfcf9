//! Data-driven tuning
//!
//! Every constant the simulation reads lives here so the host page can
//! override any subset with a JSON blob. Missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{FRAME_MS, MAX_DELTA_UNITS};

/// Errors from loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Scroll speeds and frame normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Near-layer scroll per nominal frame (pixels)
    pub base_speed: f32,
    /// Distant layer moves `base_speed / parallax_ratio`
    pub parallax_ratio: f32,
    /// Cloud drift per nominal frame
    pub cloud_speed: f32,
    /// Smallest scroll step ever applied while moving
    pub min_step: f32,
    /// Milliseconds in one delta unit
    pub frame_ms: f64,
    /// Upper clamp for a single frame's delta units
    pub max_delta_units: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            base_speed: 8.0,
            parallax_ratio: 4.0,
            cloud_speed: 0.5,
            min_step: 0.5,
            frame_ms: FRAME_MS,
            max_delta_units: MAX_DELTA_UNITS,
        }
    }
}

/// Sun/moon arc geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CelestialTuning {
    /// Sprite width; also the off-screen lead-in of the looping range
    pub body_size: f32,
    /// Arc peak as a fraction of the horizon height (0 = top of screen)
    pub peak_fraction: f32,
    /// Pixels below the horizon still treated as "at the extreme"
    pub apex_epsilon: f32,
}

impl Default for CelestialTuning {
    fn default() -> Self {
        Self {
            body_size: 125.0,
            peak_fraction: 0.0,
            apex_epsilon: 0.5,
        }
    }
}

/// Day/night brightness curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessTuning {
    /// Brightness with either body at the horizon
    pub medium_dark: f32,
    /// Brightness with the sun at its peak
    pub bright: f32,
    /// Brightness with the moon at its peak
    pub dark: f32,
    /// Per-frame easing factor, in (0, 1]
    pub smoothing: f32,
    /// Clouds never dim below this
    pub cloud_floor: f32,
}

impl Default for BrightnessTuning {
    fn default() -> Self {
        Self {
            medium_dark: 0.6,
            bright: 1.0,
            dark: 0.3,
            smoothing: 0.6,
            cloud_floor: 0.25,
        }
    }
}

/// Placement of one decorative cloud
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CloudLayout {
    /// Initial x as a fraction of screen width
    pub x_fraction: f32,
    pub y: f32,
    pub size: f32,
    /// Multiplier on the shared drift rate (bigger clouds read as closer)
    pub speed_multiplier: f32,
}

/// Cloud population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudTuning {
    pub clouds: Vec<CloudLayout>,
}

impl Default for CloudTuning {
    fn default() -> Self {
        Self {
            clouds: vec![
                CloudLayout { x_fraction: 0.15, y: 200.0, size: 150.0, speed_multiplier: 1.0 },
                CloudLayout { x_fraction: 0.55, y: 120.0, size: 110.0, speed_multiplier: 0.7 },
                CloudLayout { x_fraction: 0.85, y: 260.0, size: 180.0, speed_multiplier: 1.3 },
            ],
        }
    }
}

/// Coin spawn cadence and hitbox
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinTuning {
    /// World distance between spawns
    pub spacing: f32,
    /// Vertical offsets from the player's ground line, cycled round-robin
    pub y_offsets: Vec<f32>,
    /// Coin sprite is square
    pub size: f32,
    /// Transparent border inside the coin sprite
    pub whitespace: f32,
    /// Coins further than `cull_factor * screen_width` behind the frontier are dropped
    pub cull_factor: f32,
    /// Extra margin either side of the screen where coins still count as visible
    pub visible_margin: f32,
}

impl Default for CoinTuning {
    fn default() -> Self {
        Self {
            spacing: 500.0,
            y_offsets: vec![50.0, -20.0, -10.0],
            size: 50.0,
            whitespace: 10.0,
            cull_factor: 1.5,
            visible_margin: 100.0,
        }
    }
}

/// Player sprite placement and jump
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Fixed screen x of the sprite's left edge
    pub screen_x: f32,
    pub width: f32,
    pub height: f32,
    /// Screen y of the sprite's top edge when grounded
    pub ground_y: f32,
    /// Peak rise of the rendered jump arc
    pub jump_height: f32,
    pub jump_ms: f64,
    /// Upward shift of the hitbox while airborne
    pub jump_collision_offset: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            screen_x: 100.0,
            width: 75.0,
            height: 70.0,
            ground_y: 380.0,
            jump_height: 75.0,
            jump_ms: 500.0,
            jump_collision_offset: 20.0 + 70.0 / 2.0,
        }
    }
}

/// Complete tuning set for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub motion: MotionTuning,
    pub celestial: CelestialTuning,
    pub brightness: BrightnessTuning,
    pub clouds: CloudTuning,
    pub coins: CoinTuning,
    pub player: PlayerTuning,
    /// Seed for the cloud flip RNG
    pub seed: u64,
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning blob
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Like `from_json`, but falls back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values that would divide by zero or stall the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid { field, reason: "must be finite and > 0" })
            }
        }

        positive("motion.base_speed", self.motion.base_speed)?;
        positive("motion.parallax_ratio", self.motion.parallax_ratio)?;
        positive("motion.min_step", self.motion.min_step)?;
        positive("motion.max_delta_units", self.motion.max_delta_units)?;
        if !(self.motion.frame_ms.is_finite() && self.motion.frame_ms > 0.0) {
            return Err(TuningError::Invalid {
                field: "motion.frame_ms",
                reason: "must be finite and > 0",
            });
        }

        let smoothing = self.brightness.smoothing;
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            return Err(TuningError::Invalid {
                field: "brightness.smoothing",
                reason: "must be in (0, 1]",
            });
        }

        positive("celestial.body_size", self.celestial.body_size)?;

        if self.clouds.clouds.is_empty() {
            return Err(TuningError::Invalid { field: "clouds.clouds", reason: "needs at least one cloud" });
        }
        for cloud in &self.clouds.clouds {
            positive("clouds.clouds[].size", cloud.size)?;
        }

        positive("coins.spacing", self.coins.spacing)?;
        positive("coins.size", self.coins.size)?;
        if self.coins.y_offsets.is_empty() {
            return Err(TuningError::Invalid { field: "coins.y_offsets", reason: "needs at least one offset" });
        }

        positive("player.width", self.player.width)?;
        if !(self.player.jump_ms.is_finite() && self.player.jump_ms > 0.0) {
            return Err(TuningError::Invalid {
                field: "player.jump_ms",
                reason: "must be finite and > 0",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "motion": { "base_speed": 12.0 }, "seed": 7 }"#).unwrap();
        assert_eq!(tuning.motion.base_speed, 12.0);
        assert_eq!(tuning.motion.parallax_ratio, 4.0);
        assert_eq!(tuning.coins.spacing, 500.0);
        assert_eq!(tuning.seed, 7);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "motion": { "parallax_ratio": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "motion.parallax_ratio", .. }));

        let err = Tuning::from_json(r#"{ "brightness": { "smoothing": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "brightness.smoothing", .. }));

        let err = Tuning::from_json(r#"{ "celestial": { "body_size": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "celestial.body_size", .. }));

        let err = Tuning::from_json(r#"{ "coins": { "y_offsets": [] } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "coins.y_offsets", .. }));
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
        let tuning = Tuning::from_json_or_default("{ nope");
        assert_eq!(tuning.motion.base_speed, MotionTuning::default().base_speed);
    }
}
