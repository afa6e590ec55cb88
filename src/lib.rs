//! Rising Tide core crate.
//!
//! Characters fall toward rising water; type them before they land. Every
//! landing lifts the water, and the game ends when it reaches the top.
//!
//! The rules live in [`GameState`], which knows nothing about the browser:
//! a host calls `start`, `tick(now)` every animation frame and
//! `press_key(key, now)` on input. The `web` module is the canvas host used
//! by `start_game()`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod danger;
pub mod error;
pub mod game;
mod logging;
pub mod palette;
pub mod particles;
pub mod snapshot;
pub mod spawner;
pub mod water;
pub mod web;

pub use config::GameConfig;
pub use error::GameError;
pub use game::{FrameReport, GameState, Viewport};
pub use snapshot::GameSnapshot;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::init(level);
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start_canvas_host()
}
