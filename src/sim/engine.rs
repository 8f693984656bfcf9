//! Session engine
//!
//! One long-lived object owns every subsystem. Each `frame` runs a single
//! update phase in a fixed order (player timers, motion, celestial,
//! brightness, clouds, coin spawn, collision) and then builds a read-only
//! snapshot for the renderer. Input events only touch the player's flags;
//! subsystems see those flags as one immutable copy per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::brightness::{BrightnessFilter, BrightnessState};
use super::celestial::CelestialState;
use super::clouds::{Cloud, CloudField};
use super::coins::{Coin, CoinField, PlayerBox};
use super::motion::{MotionIntegrator, MotionLoop};
use super::player::{InputAction, JumpPhase, Player};
use super::state::{CelestialBody, Direction, EngineEvent, PlayerMotionFlags, ScrollState};
use crate::tuning::Tuning;
use crate::Viewport;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub scroll: ScrollState,
    pub active_body: CelestialBody,
    /// Screen position of the active body
    pub celestial: Vec2,
    pub brightness: BrightnessState,
    pub clouds: Vec<Cloud>,
    pub live_coins: Vec<Coin>,
    pub visible_coins: Vec<Coin>,
    /// Upward sprite offset from the jump arc
    pub player_vertical_offset: f32,
    pub player_flags: PlayerMotionFlags,
    pub facing: Direction,
    /// Motion loop running (wheels spin, arms swing)
    pub wheels_turning: bool,
    pub introduction: bool,
    pub coins_collected: u32,
    pub ready: bool,
}

/// Result of one `frame` call
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub snapshot: Snapshot,
    pub events: Vec<EngineEvent>,
}

/// World state that `restart` rebuilds from scratch
#[derive(Debug, Clone)]
struct World {
    player: Player,
    integrator: MotionIntegrator,
    celestial: CelestialState,
    brightness: BrightnessFilter,
    clouds: CloudField,
    coins: CoinField,
}

impl World {
    fn new(tuning: &Tuning, viewport: Viewport) -> Self {
        let integrator = MotionIntegrator::new(&tuning.motion);
        let scroll = integrator.state();
        let celestial = CelestialState::new(scroll.distant_position, viewport, &tuning.celestial);
        let brightness = BrightnessFilter::new(
            celestial.active_body,
            celestial.position.y,
            viewport.horizon_y(),
            &tuning.brightness,
        );
        Self {
            player: Player::new(&tuning.player),
            integrator,
            celestial,
            brightness,
            clouds: CloudField::initialize(&tuning.clouds.clouds, viewport.width, tuning.seed),
            coins: CoinField::new(&tuning.coins, scroll.scroll_position),
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    tuning: Tuning,
    viewport: Viewport,
    world: World,
    motion: MotionLoop,
    /// Lifecycle gate; inert until the intro sequence finishes
    ready: bool,
    /// False once disposed
    active: bool,
    /// Events raised by input between frames
    pending: Vec<EngineEvent>,
    last_now: f64,
}

impl Engine {
    pub fn new(tuning: Tuning, width: f32, height: f32) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Tuning::default()
            }
        };
        let viewport = Viewport::sanitized(width, height);
        log::info!(
            "Engine created ({}x{}, seed {})",
            viewport.width,
            viewport.height,
            tuning.seed
        );
        Self {
            world: World::new(&tuning, viewport),
            motion: MotionLoop::new(&tuning.motion),
            tuning,
            viewport,
            ready: false,
            active: true,
            pending: Vec::new(),
            last_now: 0.0,
        }
    }

    /// Open or close the lifecycle gate
    pub fn set_ready(&mut self, ready: bool) {
        if !self.active || ready == self.ready {
            return;
        }
        self.ready = ready;
        if ready {
            log::info!("Session ready");
        } else {
            self.motion.cancel();
            self.world.player.cancel();
            log::info!("Session paused");
        }
    }

    pub fn key_down(&mut self, action: InputAction) {
        if !self.accepts_input() {
            return;
        }
        match action {
            InputAction::Restart => self.restart(),
            _ => self.world.player.key_down(action, &mut self.pending),
        }
    }

    pub fn key_up(&mut self, action: InputAction) {
        if !self.accepts_input() {
            return;
        }
        self.world.player.key_up(action);
    }

    fn accepts_input(&self) -> bool {
        self.active && self.ready
    }

    /// Reset the world to its initial state, keeping the session ready.
    /// Events queued by input before the reset are dropped.
    pub fn restart(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.pending.clear();
        if self.motion.is_active() {
            self.pending.push(EngineEvent::MotionStopped);
        }
        self.motion.cancel();
        self.world = World::new(&self.tuning, self.viewport);
        log::info!("World restarted");
    }

    /// Re-derive viewport-dependent values. Positions already in flight are
    /// kept; clouds beyond the new right edge wrap back in.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !self.active {
            return;
        }
        self.viewport = Viewport::sanitized(width, height);
        self.world.clouds.refit(self.viewport.width);
        log::debug!("Resized to {}x{}", self.viewport.width, self.viewport.height);
    }

    /// Cancel everything; later calls are no-ops
    pub fn dispose(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.motion.cancel();
        self.world.player.cancel();
        self.pending.clear();
        log::info!("Engine disposed");
    }

    /// Run one animation frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        if !self.active {
            log::warn!("Frame after dispose ignored");
            return FrameReport { snapshot: self.snapshot(), events: Vec::new() };
        }
        if !self.ready {
            self.last_now = now_ms;
            return FrameReport { snapshot: self.snapshot(), events: Vec::new() };
        }

        let mut events = std::mem::take(&mut self.pending);
        let world = &mut self.world;
        let tuning = &self.tuning;
        let viewport = self.viewport;

        world.player.update(now_ms, &mut events);
        let flags = world.player.flags();
        let direction = flags.direction();

        if let Some(event) = self.motion.sync(&flags) {
            events.push(event);
        }

        if self.motion.is_active() {
            let delta_units = self.motion.delta(now_ms);
            let scroll = world.integrator.advance(&flags, delta_units);
            let step = world.integrator.last_step();

            if let Some(event) =
                world.celestial.update(scroll.distant_position, direction, viewport, &tuning.celestial)
            {
                events.push(event);
            }
            world.brightness.step(
                world.celestial.active_body,
                world.celestial.position.y,
                viewport.horizon_y(),
            );
            world
                .clouds
                .advance(world.integrator.cloud_rate(direction), step.units, viewport.width);

            if let Some(coin) = world.coins.maybe_spawn(
                scroll.scroll_position,
                direction == Direction::Backward,
                viewport.width,
                tuning.player.ground_y,
            ) {
                events.push(EngineEvent::CoinSpawned { id: coin.id });
            }
        }

        // Collision polls every frame, moving or not
        let player_box = PlayerBox::from_tuning(&tuning.player, flags.jumping);
        world.coins.collect_hits(
            world.integrator.state().scroll_position,
            viewport.width,
            &player_box,
            &mut events,
        );

        self.last_now = now_ms;
        FrameReport { snapshot: self.snapshot(), events }
    }

    /// Whether the host should schedule another animation frame
    pub fn wants_frame(&self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let world = &self.world;
        let scroll = world.integrator.state().scroll_position;
        self.motion.is_active()
            || !self.pending.is_empty()
            || world.player.flags().is_moving()
            || world.player.jump_phase() != JumpPhase::Grounded
            || world.coins.visible(scroll, self.viewport.width).next().is_some()
    }

    /// Read-only view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let world = &self.world;
        let scroll = world.integrator.state();
        Snapshot {
            scroll,
            active_body: world.celestial.active_body,
            celestial: world.celestial.position,
            brightness: world.brightness.state(),
            clouds: world.clouds.clouds().to_vec(),
            live_coins: world.coins.coins().to_vec(),
            visible_coins: world
                .coins
                .visible(scroll.scroll_position, self.viewport.width)
                .copied()
                .collect(),
            player_vertical_offset: world.player.vertical_offset(self.last_now),
            player_flags: world.player.flags(),
            facing: world.player.facing(),
            wheels_turning: self.motion.is_active(),
            introduction: world.player.in_introduction(),
            coins_collected: world.coins.collected(),
            ready: self.ready,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_engine() -> Engine {
        let mut e = Engine::new(Tuning::default(), 1000.0, 800.0);
        e.set_ready(true);
        // Leave the introduction
        e.key_down(InputAction::Jump);
        e
    }

    #[test]
    fn test_inert_until_ready() {
        let mut e = Engine::new(Tuning::default(), 1000.0, 800.0);
        e.key_down(InputAction::Jump);
        e.key_down(InputAction::MoveForward);
        let report = e.frame(0.0);
        assert!(report.events.is_empty());
        assert!(report.snapshot.introduction);
        assert!(!e.wants_frame());
    }

    #[test]
    fn test_motion_start_stop_events() {
        let mut e = ready_engine();
        e.frame(0.0);
        e.key_down(InputAction::MoveForward);
        let r = e.frame(16.67);
        assert!(r.events.contains(&EngineEvent::MotionStarted));
        assert!(r.snapshot.wheels_turning);
        assert!(r.snapshot.scroll.scroll_position < 0.0);

        e.key_up(InputAction::MoveForward);
        let r = e.frame(33.34);
        assert!(r.events.contains(&EngineEvent::MotionStopped));
        assert!(!r.snapshot.wheels_turning);
    }

    #[test]
    fn test_idle_frames_leave_scroll_untouched() {
        let mut e = ready_engine();
        for i in 0..10 {
            e.frame(i as f64 * 16.67);
        }
        assert_eq!(e.snapshot().scroll, ScrollState::default());
    }

    #[test]
    fn test_restart_resets_world() {
        let mut e = ready_engine();
        e.key_down(InputAction::MoveForward);
        for i in 0..100 {
            e.frame(i as f64 * 16.67);
        }
        assert!(e.snapshot().scroll.scroll_position < -700.0);

        e.key_down(InputAction::Restart);
        let s = e.snapshot();
        assert_eq!(s.scroll, ScrollState::default());
        assert!(s.introduction);
        assert!(s.live_coins.is_empty());
        assert!(e.is_ready());
    }

    #[test]
    fn test_restart_drops_queued_input_events() {
        let mut e = Engine::new(Tuning::default(), 1000.0, 800.0);
        e.set_ready(true);
        e.key_down(InputAction::Jump);
        e.key_down(InputAction::Restart);
        let r = e.frame(0.0);
        assert!(r.events.is_empty());
        assert!(r.snapshot.introduction);
        assert!(!r.snapshot.player_flags.jumping);
    }

    #[test]
    fn test_restart_respects_ready_gate() {
        let mut e = ready_engine();
        e.key_down(InputAction::MoveForward);
        for i in 0..10 {
            e.frame(i as f64 * 16.67);
        }
        e.set_ready(false);
        e.restart();
        assert!(e.snapshot().scroll.scroll_position < 0.0);
        assert!(!e.snapshot().introduction);
    }

    #[test]
    fn test_snapshot_positions_serialize_as_pairs() {
        let mut e = ready_engine();
        e.key_down(InputAction::MoveForward);
        for i in 0..70 {
            e.frame(i as f64 * 16.67);
        }
        let s = e.snapshot();
        assert!(!s.live_coins.is_empty());

        let json = serde_json::to_value(&s).unwrap();
        let celestial = json["celestial"].as_array().unwrap();
        assert_eq!(celestial.len(), 2);
        assert!((celestial[1].as_f64().unwrap() as f32 - s.celestial.y).abs() < 1e-3);
        assert_eq!(json["clouds"][0]["pos"].as_array().unwrap().len(), 2);
        assert_eq!(json["live_coins"][0]["pos"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_dispose_makes_frames_noops() {
        let mut e = ready_engine();
        e.key_down(InputAction::MoveForward);
        e.frame(0.0);
        e.dispose();
        let before = e.snapshot().scroll;
        let r = e.frame(16.67);
        assert!(r.events.is_empty());
        assert_eq!(r.snapshot.scroll, before);
        assert!(!e.wants_frame());
        e.key_down(InputAction::MoveBackward);
        assert!(!e.snapshot().player_flags.is_moving());
    }

    #[test]
    fn test_bad_viewport_and_tuning_fall_back() {
        let mut tuning = Tuning::default();
        tuning.motion.parallax_ratio = 0.0;
        let e = Engine::new(tuning, 0.0, f32::NAN);
        assert_eq!(e.viewport(), Viewport::default());
        assert_eq!(e.tuning().motion.parallax_ratio, 4.0);
    }

    #[test]
    fn test_resize_does_not_panic_mid_motion() {
        let mut e = ready_engine();
        e.key_down(InputAction::MoveForward);
        e.frame(0.0);
        e.resize(10.0, 10.0);
        let r = e.frame(16.67);
        for c in &r.snapshot.clouds {
            assert!(c.pos.x <= 10.0);
        }
        e.resize(0.0, 0.0);
        let r = e.frame(33.34);
        assert!(r.snapshot.celestial.y.is_finite());
    }
}
