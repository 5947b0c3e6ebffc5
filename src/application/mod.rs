//! Application wiring
//!
//! Turns loaded settings into a storage backend, the handlers, and a
//! running HTTP server.

pub mod app;

pub use app::Application;
