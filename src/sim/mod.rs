//! Frame-stepped simulation module
//!
//! All scene logic lives here. This module must stay platform-free:
//! - Time arrives as host timestamps, never read from a global clock
//! - Seeded RNG only
//! - One update phase per frame, then one read-only snapshot
//! - No rendering or DOM dependencies

pub mod brightness;
pub mod celestial;
pub mod clock;
pub mod clouds;
pub mod coins;
pub mod engine;
pub mod motion;
pub mod player;
pub mod state;

pub use brightness::{BrightnessFilter, BrightnessState, target_brightness};
pub use celestial::{CelestialState, FlipGuard, compute_arc};
pub use clock::Ticker;
pub use clouds::{Cloud, CloudField};
pub use coins::{Coin, CoinField, PlayerBox, SpawnFrontier, check_collision};
pub use engine::{Engine, FrameReport, Snapshot};
pub use motion::{MotionIntegrator, MotionLoop, MotionStep};
pub use player::{InputAction, JumpPhase, Player};
pub use state::{CelestialBody, CoinId, Direction, EngineEvent, PlayerMotionFlags, ScrollState};
