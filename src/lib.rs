//! EarthCare core crate.
//!
//! Kids look after a small planet: a daily eco check-in keeps it healthy,
//! skipped days hurt it, and mini-games, stories and approved photos earn
//! repairs, streaks and badges. Everything except `web::app` is plain Rust
//! and runs under `cargo test` on the host; the browser shell is started from
//! JavaScript with [`start_app`].

use wasm_bindgen::prelude::*;

pub mod admin;
pub mod audio;
pub mod config;
pub mod error;
pub mod games;
pub mod geometry;
pub mod logging;
pub mod persist;
pub mod reducer;
pub mod router;
pub mod state;
pub mod story;
pub mod timers;
pub mod web;

pub use config::GameConfig;
pub use error::{EarthError, Rejection};
pub use reducer::{Action, CheckInChoice, Effect, Transition, reduce};
pub use state::{AppState, EarthState, Mode};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

/// Mount the app into the page. `config_json` may override any subset of
/// [`GameConfig`] fields (camelCase keys); a bad override falls back to the
/// defaults. Calling it again while the app runs is a no-op.
#[wasm_bindgen]
pub fn start_app(config_json: Option<String>) -> Result<(), JsValue> {
    let cfg = GameConfig::from_json_or_default(config_json.as_deref());
    #[cfg(target_arch = "wasm32")]
    {
        web::app::start(cfg)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = cfg;
        Err(EarthError::Dom("start_app needs a browser".into()).into())
    }
}

/// Default storage key, for pages that want to inspect or wipe saved progress.
#[wasm_bindgen]
pub fn storage_key() -> String {
    config::STORAGE_KEY.to_string()
}
