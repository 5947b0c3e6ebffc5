//! Infrastructure layer for roll call
//!
//! This module contains the storage seams the services depend on, the
//! PostgreSQL and in-memory implementations behind them, and shared log
//! message constants.

pub mod database;
pub mod log_messages;
pub mod memory;
pub mod repository;

pub use database::PostgresStore;
pub use memory::InMemoryStore;
pub use repository::*;
