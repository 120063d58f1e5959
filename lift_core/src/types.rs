//! Core domain types for LiftVault.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their classification
//! - Workout templates and their exercise assignments
//! - Routines (scheduling templates) and their workout mappings
//! - The active session, its draft set data, and logged history
//! - User settings

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Generate a fresh row id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as epoch milliseconds, the storage timestamp format
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

// ============================================================================
// Exercise Types
// ============================================================================

/// How an exercise is performed and measured
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseType {
    Strength,
    Bodyweight,
    Endurance,
    Isometric,
    WeightedBw,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Strength => "STRENGTH",
            ExerciseType::Bodyweight => "BODYWEIGHT",
            ExerciseType::Endurance => "ENDURANCE",
            ExerciseType::Isometric => "ISOMETRIC",
            ExerciseType::WeightedBw => "WEIGHTED_BW",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STRENGTH" => Some(ExerciseType::Strength),
            "BODYWEIGHT" => Some(ExerciseType::Bodyweight),
            "ENDURANCE" => Some(ExerciseType::Endurance),
            "ISOMETRIC" => Some(ExerciseType::Isometric),
            "WEIGHTED_BW" => Some(ExerciseType::WeightedBw),
            _ => None,
        }
    }
}

/// Closed set of muscle groups
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    LegsQuads,
    LegsHams,
    Calves,
    Core,
    Cardio,
}

impl MuscleGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "CHEST",
            MuscleGroup::Back => "BACK",
            MuscleGroup::Shoulders => "SHOULDERS",
            MuscleGroup::Biceps => "BICEPS",
            MuscleGroup::Triceps => "TRICEPS",
            MuscleGroup::LegsQuads => "LEGS_QUADS",
            MuscleGroup::LegsHams => "LEGS_HAMS",
            MuscleGroup::Calves => "CALVES",
            MuscleGroup::Core => "CORE",
            MuscleGroup::Cardio => "CARDIO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CHEST" => Some(MuscleGroup::Chest),
            "BACK" => Some(MuscleGroup::Back),
            "SHOULDERS" => Some(MuscleGroup::Shoulders),
            "BICEPS" => Some(MuscleGroup::Biceps),
            "TRICEPS" => Some(MuscleGroup::Triceps),
            "LEGS_QUADS" => Some(MuscleGroup::LegsQuads),
            "LEGS_HAMS" => Some(MuscleGroup::LegsHams),
            "CALVES" => Some(MuscleGroup::Calves),
            "CORE" => Some(MuscleGroup::Core),
            "CARDIO" => Some(MuscleGroup::Cardio),
            _ => None,
        }
    }
}

/// An exercise definition
///
/// Identity is immutable; attributes may change. Rows flagged
/// `is_base_content` are seeded and protected from deletion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub exercise_type: ExerciseType,
    pub muscle_group: MuscleGroup,
    pub is_base_content: bool,
    pub last_modified: i64,
}

// ============================================================================
// Workout Template Types
// ============================================================================

/// A named, ordered workout template
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub last_modified: i64,
}

/// One exercise assignment within a workout template
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: String,
    pub workout_id: String,
    pub exercise_id: String,
    pub order_index: i64,
    pub target_sets: u32,
    pub target_reps: u32,
    pub last_modified: i64,
}

/// A resolved workout entry handed to the session state machine
#[derive(Clone, Debug)]
pub struct PlannedExercise {
    pub exercise: Exercise,
    pub target_sets: u32,
    pub target_reps: u32,
}

// ============================================================================
// Routine Types
// ============================================================================

/// How a routine sequences its workouts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutineMode {
    /// One workout slot per weekday; empty slots are rest days
    Weekly,
    /// An ordered repeating queue, advanced by cycle count
    Async,
}

impl RoutineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutineMode::Weekly => "WEEKLY",
            RoutineMode::Async => "ASYNC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WEEKLY" => Some(RoutineMode::Weekly),
            "ASYNC" => Some(RoutineMode::Async),
            _ => None,
        }
    }
}

/// A scheduling template producing a sequence of workouts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub mode: RoutineMode,
    pub duration: i64,
    pub cycle_count: i64,
    pub last_modified: i64,
}

/// One (workout, position) mapping within a routine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutineWorkout {
    pub id: String,
    pub routine_id: String,
    pub workout_id: String,
    pub order_index: i64,
    pub last_modified: i64,
}

/// Result of next-workout derivation
#[derive(Clone, Debug)]
pub enum NextWorkout {
    Workout(Workout),
    /// WEEKLY routines yield this for an unmapped weekday
    RestDay,
}

// ============================================================================
// Session Types
// ============================================================================

/// The singleton in-progress workout instance
///
/// At most one row exists at any time; its draft snapshot is persisted
/// on every mutation so the session survives a process restart.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActiveSession {
    pub id: String,
    pub workout_id: String,
    pub started_at: i64,
    pub is_swapped: bool,
    pub last_modified: i64,
}

/// One planned/performed set inside the active session's draft snapshot
///
/// Entries with neither flag set are dropped on commit, not logged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetDraft {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ms: Option<i64>,
    pub is_skipped: bool,
    pub is_completed: bool,
}

impl SetDraft {
    /// A fresh draft entry pre-filled with the target rep count
    pub fn with_target_reps(target_reps: u32) -> Self {
        Self {
            id: new_id(),
            weight: None,
            reps: Some(target_reps),
            time_ms: None,
            is_skipped: false,
            is_completed: false,
        }
    }

    /// Whether this entry becomes a logged set on commit
    pub fn is_loggable(&self) -> bool {
        self.is_completed || self.is_skipped
    }
}

/// Exercise id → ordered set entries; the serialized form of
/// `Active_Session.draft_data`
pub type DraftMap = BTreeMap<String, Vec<SetDraft>>;

/// Permanent record of a committed session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedSession {
    pub id: String,
    pub workout_id: String,
    pub performed_at: i64,
    pub is_swapped: bool,
    pub last_modified: i64,
}

/// Permanent record of one completed or skipped set
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedSet {
    pub id: String,
    pub session_id: String,
    pub exercise_id: String,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub time_ms: Option<i64>,
    pub is_skipped: bool,
    pub last_modified: i64,
}

// ============================================================================
// Settings Types
// ============================================================================

/// Unit system for weights
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitSystem {
    Kg,
    Lbs,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Kg => "KG",
            UnitSystem::Lbs => "LBS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "KG" => Some(UnitSystem::Kg),
            "LBS" => Some(UnitSystem::Lbs),
            _ => None,
        }
    }
}

/// The singleton settings row (id fixed to 1)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserSettings {
    pub id: i64,
    pub active_routine_id: Option<String>,
    pub unit_system: UnitSystem,
    pub rest_timer_enabled: bool,
    pub rest_timer_sound: bool,
    pub default_rest_duration: i64,
    pub calendar_sync_enabled: bool,
    pub sync_history_limit_months: i64,
    pub last_sync_timestamp: Option<i64>,
    pub vault_connection_token: Option<String>,
    pub last_modified: i64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            id: 1,
            active_routine_id: None,
            unit_system: UnitSystem::Kg,
            rest_timer_enabled: true,
            rest_timer_sound: true,
            default_rest_duration: 90,
            calendar_sync_enabled: false,
            sync_history_limit_months: 12,
            last_sync_timestamp: None,
            vault_connection_token: None,
            last_modified: 0,
        }
    }
}
