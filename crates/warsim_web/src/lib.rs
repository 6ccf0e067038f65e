//! Browser control panel for the war simulation service.
//!
//! This crate is a stub by default so the workspace builds and tests on the
//! host without a wasm toolchain. Enable the real app with `--features web`
//! on a wasm32 target.

pub mod form_model;

/// Placeholder function for non-web (or non-wasm) builds.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
pub fn placeholder() {
    // No-op.
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::start;
