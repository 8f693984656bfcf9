//! Platform abstraction layer
//!
//! Handles browser specifics for:
//! - Physical key to logical action mapping
//! - requestAnimationFrame scheduling that suspends while idle
//! - Viewport size and resize
//! - Teardown of listeners and pending frames

pub mod keymap;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use keymap::action_for_key;
