//! Parallax Stroll entry point
//!
//! The browser build is driven from JS through `platform::web::StrollHandle`.
//! Natively this runs a scripted walk headless and prints the final snapshot,
//! which is handy for eyeballing tuning changes.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use parallax_stroll::sim::{Engine, EngineEvent, InputAction};
    use parallax_stroll::tuning::Tuning;

    env_logger::init();
    log::info!("Parallax Stroll (native) starting...");

    // Optional tuning JSON path as the first argument
    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {path}: {e}");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let frame_ms = tuning.motion.frame_ms;
    let mut engine = Engine::new(tuning, 1280.0, 720.0);
    engine.set_ready(true);
    engine.key_down(InputAction::Jump);

    let mut now = 0.0;
    let mut spawned = 0;
    let mut collected = 0;
    let mut flips = 0;

    for frame in 0..1200u32 {
        match frame {
            40 => engine.key_down(InputAction::MoveForward),
            900 => engine.key_up(InputAction::MoveForward),
            910 => engine.key_down(InputAction::MoveBackward),
            1100 => engine.key_up(InputAction::MoveBackward),
            _ => {}
        }
        // Hop every second so high coins get picked up too
        if frame % 60 == 0 {
            engine.key_down(InputAction::Jump);
        }

        let report = engine.frame(now);
        for event in &report.events {
            match event {
                EngineEvent::CoinSpawned { .. } => spawned += 1,
                EngineEvent::CoinCollected { .. } => collected += 1,
                EngineEvent::CelestialFlipped { .. } => flips += 1,
                _ => {}
            }
        }
        now += frame_ms;
    }

    let snapshot = engine.snapshot();
    log::info!(
        "Walk done: scroll={:.1} spawned={} collected={} flips={}",
        snapshot.scroll.scroll_position,
        spawned,
        collected,
        flips
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Snapshot serialization failed: {e}"),
    }
    engine.dispose();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is StrollHandle, this is just to satisfy the compiler
}
