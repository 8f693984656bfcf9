//! Browser driver
//!
//! Owns the engine behind `Rc<RefCell<_>>`, wires window key and resize
//! listeners, and schedules animation frames only while the engine asks for
//! them. Snapshots go to a JS callback as JSON; rendering stays in JS.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use super::keymap::action_for_key;
use crate::sim::{Engine, EngineEvent, InputAction};
use crate::tuning::Tuning;

struct Driver {
    engine: Engine,
    on_frame: js_sys::Function,
    on_collect: Option<js_sys::Function>,
    /// Pending requestAnimationFrame handle
    raf_id: Option<i32>,
}

type Shared = Rc<RefCell<Driver>>;
type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// Handle returned to the page; dropping or disposing it tears everything down
#[wasm_bindgen]
pub struct StrollHandle {
    driver: Shared,
    listeners: Vec<(&'static str, Listener)>,
}

#[wasm_bindgen]
impl StrollHandle {
    /// Create the engine at the current window size and attach listeners.
    /// `on_frame` receives the snapshot JSON each frame; `on_collect` receives
    /// the id of every collected coin.
    #[wasm_bindgen(constructor)]
    pub fn new(
        tuning_json: Option<String>,
        on_frame: js_sys::Function,
        on_collect: Option<js_sys::Function>,
    ) -> Result<StrollHandle, JsValue> {
        console_error_panic_hook::set_once();
        // A second handle on the same page keeps the first logger
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let (width, height) = window_size(&window);
        let tuning = tuning_json
            .as_deref()
            .map(Tuning::from_json_or_default)
            .unwrap_or_default();

        let driver = Rc::new(RefCell::new(Driver {
            engine: Engine::new(tuning, width, height),
            on_frame,
            on_collect,
            raf_id: None,
        }));

        let mut handle = StrollHandle { driver, listeners: Vec::new() };
        handle.attach_listeners(&window)?;
        log::info!("Parallax Stroll attached");
        Ok(handle)
    }

    /// Open the lifecycle gate once the intro sequence is done
    #[wasm_bindgen(js_name = setReady)]
    pub fn set_ready(&self, ready: bool) {
        self.driver.borrow_mut().engine.set_ready(ready);
        schedule(&self.driver);
    }

    /// Current snapshot as JSON (for the first paint before any frame)
    pub fn snapshot(&self) -> String {
        let snapshot = self.driver.borrow().engine.snapshot();
        serde_json::to_string(&snapshot).unwrap_or_default()
    }

    /// Cancel the pending frame, detach listeners, and stop the engine
    pub fn dispose(&mut self) {
        {
            let mut d = self.driver.borrow_mut();
            d.engine.dispose();
            if let (Some(id), Some(window)) = (d.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
        if let Some(window) = web_sys::window() {
            for (event, listener) in self.listeners.drain(..) {
                let _ = window
                    .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
            }
        }
    }
}

impl StrollHandle {
    fn attach_listeners(&mut self, window: &web_sys::Window) -> Result<(), JsValue> {
        // Key down
        {
            let driver = self.driver.clone();
            let listener = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(action) = key_action(&event) else { return };
                if action == InputAction::Jump {
                    // Space would otherwise scroll the page
                    event.prevent_default();
                }
                driver.borrow_mut().engine.key_down(action);
                schedule(&driver);
            });
            window.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())?;
            self.listeners.push(("keydown", listener));
        }

        // Key up
        {
            let driver = self.driver.clone();
            let listener = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                if let Some(action) = key_action(&event) {
                    driver.borrow_mut().engine.key_up(action);
                    schedule(&driver);
                }
            });
            window.add_event_listener_with_callback("keyup", listener.as_ref().unchecked_ref())?;
            self.listeners.push(("keyup", listener));
        }

        // Resize
        {
            let driver = self.driver.clone();
            let listener = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    let (w, h) = window_size(&window);
                    driver.borrow_mut().engine.resize(w, h);
                }
            });
            window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
            self.listeners.push(("resize", listener));
        }

        Ok(())
    }
}

impl Drop for StrollHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn key_action(event: &web_sys::Event) -> Option<InputAction> {
    event
        .dyn_ref::<KeyboardEvent>()
        .and_then(|k| action_for_key(&k.key()))
}

fn window_size(window: &web_sys::Window) -> (f32, f32) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    // Engine::new / resize sanitize zeros
    (width as f32, height as f32)
}

/// Request a frame if the engine wants one and none is pending
fn schedule(driver: &Shared) {
    let mut d = driver.borrow_mut();
    if d.raf_id.is_some() || !d.engine.wants_frame() {
        return;
    }
    let Some(window) = web_sys::window() else { return };

    let shared = driver.clone();
    let callback = Closure::once_into_js(move |now: f64| on_animation_frame(&shared, now));
    match window.request_animation_frame(callback.unchecked_ref()) {
        Ok(id) => d.raf_id = Some(id),
        Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
    }
}

fn on_animation_frame(driver: &Shared, now: f64) {
    // Run the frame, then release the borrow before calling into JS
    let (json, collected, on_frame, on_collect) = {
        let mut d = driver.borrow_mut();
        d.raf_id = None;
        if !d.engine.is_active() {
            return;
        }
        let report = d.engine.frame(now);
        let json = match serde_json::to_string(&report.snapshot) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Snapshot serialization failed: {e}");
                return;
            }
        };
        let collected: Vec<u64> = report
            .events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::CoinCollected { id } => Some(id.0),
                _ => None,
            })
            .collect();
        (json, collected, d.on_frame.clone(), d.on_collect.clone())
    };

    if let Err(e) = on_frame.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
        log::warn!("on_frame callback threw: {e:?}");
    }
    if let Some(on_collect) = on_collect {
        for id in collected {
            let _ = on_collect.call1(&JsValue::NULL, &JsValue::from_f64(id as f64));
        }
    }

    schedule(driver);
}
