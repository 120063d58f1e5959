//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// SQLite error
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A session is already active; it must be finished or discarded first
    #[error("a session is already active; finish or discard it first")]
    SessionActive,

    /// An operation that requires an active session was called while idle
    #[error("no active session")]
    NoActiveSession,

    /// start() was called with an empty exercise list
    #[error("cannot start a session with no exercises")]
    EmptyExerciseList,

    /// start() was called with a zero-set target
    #[error("exercise {exercise_id} has target_sets = 0")]
    InvalidTargets { exercise_id: String },

    /// The exercise is not part of the active session's draft data
    #[error("exercise {exercise_id} is not in the active session")]
    ExerciseNotInSession { exercise_id: String },

    /// Base content rows cannot be deleted
    #[error("exercise {exercise_id} is base content and cannot be deleted")]
    BaseContentProtected { exercise_id: String },

    /// Entity lookup failed
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The active routine has no workouts mapped to it
    #[error("routine has no workouts to derive from")]
    NoWorkoutInRoutine,

    /// Next-workout derivation requested but no routine is active
    #[error("no active routine is set")]
    NoActiveRoutine,
}
