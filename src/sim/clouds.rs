//! Drifting decorative clouds
//!
//! A fixed population created once and wrapped around the screen edges
//! forever. Only `pos.x` changes after initialization.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::CloudLayout;

/// One cloud sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    /// Left edge x, top edge y
    pub pos: Vec2,
    pub size: f32,
    /// Mirrored horizontally
    pub flipped: bool,
    pub speed_multiplier: f32,
}

impl Cloud {
    /// Move by `dx` and wrap across the screen edges
    pub fn drift(&mut self, dx: f32, screen_width: f32) {
        self.pos.x += dx;
        if self.pos.x < -self.size {
            self.pos.x = screen_width;
        } else if self.pos.x > screen_width {
            self.pos.x = -self.size;
        }
    }
}

/// The cloud collection
#[derive(Debug, Clone)]
pub struct CloudField {
    clouds: Vec<Cloud>,
}

impl CloudField {
    /// Place one cloud per layout entry with a seeded random flip
    pub fn initialize(layouts: &[CloudLayout], screen_width: f32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let clouds = layouts
            .iter()
            .map(|layout| Cloud {
                pos: Vec2::new(layout.x_fraction * screen_width, layout.y),
                size: layout.size,
                flipped: rng.random_bool(0.5),
                speed_multiplier: layout.speed_multiplier,
            })
            .collect();
        Self { clouds }
    }

    /// Drift all clouds. `drift_rate` is signed like the scroll (negative when
    /// walking forward), so clouds slide left as the player advances.
    pub fn advance(&mut self, drift_rate: f32, delta_units: f32, screen_width: f32) -> &[Cloud] {
        for cloud in &mut self.clouds {
            cloud.drift(drift_rate * cloud.speed_multiplier * delta_units, screen_width);
        }
        &self.clouds
    }

    /// Pull clouds back into range after the screen shrinks
    pub fn refit(&mut self, screen_width: f32) {
        for cloud in &mut self.clouds {
            if cloud.pos.x > screen_width {
                cloud.pos.x = -cloud.size;
            }
        }
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::CloudTuning;

    fn field() -> CloudField {
        CloudField::initialize(&CloudTuning::default().clouds, 1000.0, 42)
    }

    #[test]
    fn test_initialize_places_fixed_population() {
        let f = field();
        assert_eq!(f.clouds().len(), 3);
        assert!((f.clouds()[0].pos.x - 150.0).abs() < 1e-4);
        assert!((f.clouds()[1].pos.x - 550.0).abs() < 1e-4);
    }

    #[test]
    fn test_seeded_flips_are_reproducible() {
        let a: Vec<bool> = field().clouds().iter().map(|c| c.flipped).collect();
        let b: Vec<bool> = field().clouds().iter().map(|c| c.flipped).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrap_past_right_edge() {
        let mut c = Cloud {
            pos: Vec2::new(995.0, 100.0),
            size: 150.0,
            flipped: true,
            speed_multiplier: 1.0,
        };
        c.drift(10.0, 1000.0);
        assert_eq!(c.pos.x, -150.0);
        assert_eq!(c.size, 150.0);
        assert!(c.flipped);
    }

    #[test]
    fn test_wrap_past_left_edge() {
        let mut c = Cloud {
            pos: Vec2::new(-145.0, 100.0),
            size: 150.0,
            flipped: false,
            speed_multiplier: 1.0,
        };
        c.drift(-10.0, 1000.0);
        assert_eq!(c.pos.x, 1000.0);
        assert!(!c.flipped);
    }

    #[test]
    fn test_advance_moves_left_when_walking_forward() {
        let mut f = field();
        let before: Vec<f32> = f.clouds().iter().map(|c| c.pos.x).collect();
        f.advance(-0.5, 2.0, 1000.0);
        for (c, x0) in f.clouds().iter().zip(before) {
            assert!((c.pos.x - (x0 - c.speed_multiplier)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_population_is_stable_over_many_frames() {
        let mut f = field();
        for _ in 0..10_000 {
            f.advance(-0.5, 3.0, 1000.0);
        }
        assert_eq!(f.clouds().len(), 3);
        for c in f.clouds() {
            assert!(c.pos.x >= -c.size && c.pos.x <= 1000.0);
        }
    }
}
