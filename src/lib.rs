//! Roll call - student roster and per-pair attendance service
//!
//! Two independent handlers sit behind an HTTP host: one records which
//! students attended which class periods ("pairs") on which day, the other
//! manages the roster itself. Both translate a method-tagged request into
//! storage calls and answer with JSON and CORS headers.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod server;
pub mod service;

pub use application::Application;
pub use error::{Error, Result};
