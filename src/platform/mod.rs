//! Platform abstraction layer
//!
//! Browser bindings live in `web`: LocalStorage-backed persistence and the
//! JS-facing game handle. Native builds use `persistence::MemoryStorage`.

#[cfg(target_arch = "wasm32")]
pub mod web;
