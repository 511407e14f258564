//! Browser surface. `render` builds markup from state and `flow` runs the
//! steps that pair a game with the store; both are testable on the host.
//! `app` owns the DOM, listeners and timers.

pub mod flow;
pub mod render;

#[cfg(target_arch = "wasm32")]
pub mod app;
