//! Host integration
//!
//! The radar core is host-agnostic. This module holds what differs per
//! target:
//! - logger setup (console on the web, env_logger natively)
//! - the browser binding (`web`): SVG surface, fetch loader, JS façade

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Install the logger for the current target. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already installed");
    }
}

/// Install the logger for the current target. Safe to call more than once.
///
/// Defaults to `info`; `RUST_LOG` overrides it.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already installed");
    }
}
