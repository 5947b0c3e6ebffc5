//! Domain types for the roster and attendance journal
//!
//! This module holds the records the services read and write, the newtypes
//! that identify them, and the day-view projection built on every read.

pub mod attendance;
pub mod student;
pub mod types;

pub use attendance::*;
pub use student::*;
pub use types::*;
