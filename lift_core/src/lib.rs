#![forbid(unsafe_code)]

//! Core domain model and business logic for the LiftVault workout
//! tracker.
//!
//! This crate provides:
//! - Domain types (exercises, workouts, routines, sessions, settings)
//! - The SQLite-backed persistent store
//! - The active-session state machine with crash recovery
//! - Routine progression policy
//! - Base-content seeding and history export

pub mod types;
pub mod error;
pub mod schema;
pub mod store;
pub mod seed;
pub mod session;
pub mod routine;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use export::export_history;
pub use routine::{derive_next_workout, derive_next_workout_today};
pub use seed::seed_base_content;
pub use session::SessionTracker;
pub use store::{CommitOutcome, Store};
