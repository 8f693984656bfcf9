//! Shared simulation state types
//!
//! Everything here is plain data: owned by the engine, copied out to
//! renderers through the per-frame snapshot.

use serde::{Deserialize, Serialize};

/// Horizontal travel direction as commanded by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    /// No horizontal travel recorded yet
    #[default]
    Unknown,
}

impl Direction {
    /// Sign applied to world positions. Walking forward scrolls the world left,
    /// so scroll and distant positions decrease.
    #[inline]
    pub fn world_sign(self) -> f32 {
        match self {
            Direction::Forward => -1.0,
            Direction::Backward => 1.0,
            Direction::Unknown => 0.0,
        }
    }

    /// True when `other` is the definite opposite of `self`
    pub fn is_reversal_of(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Forward, Direction::Backward) | (Direction::Backward, Direction::Forward)
        )
    }
}

/// Input snapshot read by every subsystem for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerMotionFlags {
    pub moving_forward: bool,
    pub moving_backward: bool,
    pub jumping: bool,
}

impl PlayerMotionFlags {
    /// Net horizontal direction. Both flags set is an input anomaly; forward wins.
    pub fn direction(&self) -> Direction {
        if self.moving_forward {
            Direction::Forward
        } else if self.moving_backward {
            Direction::Backward
        } else {
            Direction::Unknown
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving_forward || self.moving_backward
    }
}

/// World scroll offsets, mutated once per motion frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollState {
    /// Near background layer offset
    pub scroll_position: f32,
    /// Slower offset for mountains and the sun/moon
    pub distant_position: f32,
    /// Accumulated cloud drift
    pub cloud_drift: f32,
}

/// Which body currently rides the arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CelestialBody {
    #[default]
    Sun,
    Moon,
}

impl CelestialBody {
    pub fn toggled(self) -> Self {
        match self {
            CelestialBody::Sun => CelestialBody::Moon,
            CelestialBody::Moon => CelestialBody::Sun,
        }
    }
}

/// Unique coin identifier (the spawn segment number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoinId(pub u64);

/// Notable things that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    MotionStarted,
    MotionStopped,
    CelestialFlipped { body: CelestialBody },
    CoinSpawned { id: CoinId },
    CoinCollected { id: CoinId },
    JumpStarted,
    JumpLanded,
    IntroductionFinished,
}
