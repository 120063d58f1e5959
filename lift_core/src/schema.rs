//! SQLite schema for the LiftVault store.
//!
//! Executed as a single batch on open; every statement is idempotent.
//! `Active_Session` holds the full draft snapshot as a JSON blob so one
//! UPDATE is the atomic checkpoint unit for crash recovery.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS Exercises (
  id TEXT PRIMARY KEY NOT NULL,
  name TEXT NOT NULL,
  description TEXT NOT NULL DEFAULT '',
  type TEXT NOT NULL,
  muscle_group TEXT NOT NULL,
  is_base_content INTEGER NOT NULL DEFAULT 0,
  last_modified INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Workouts (
  id TEXT PRIMARY KEY NOT NULL,
  name TEXT NOT NULL,
  last_modified INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Workout_Exercises (
  id TEXT PRIMARY KEY NOT NULL,
  workout_id TEXT NOT NULL,
  exercise_id TEXT NOT NULL,
  order_index INTEGER NOT NULL,
  target_sets INTEGER NOT NULL,
  target_reps INTEGER NOT NULL,
  last_modified INTEGER NOT NULL,
  FOREIGN KEY (workout_id) REFERENCES Workouts (id) ON DELETE CASCADE,
  FOREIGN KEY (exercise_id) REFERENCES Exercises (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Routines (
  id TEXT PRIMARY KEY NOT NULL,
  name TEXT NOT NULL,
  mode TEXT NOT NULL,
  duration INTEGER NOT NULL,
  cycle_count INTEGER NOT NULL DEFAULT 0,
  last_modified INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Routine_Workouts (
  id TEXT PRIMARY KEY NOT NULL,
  routine_id TEXT NOT NULL,
  workout_id TEXT NOT NULL,
  order_index INTEGER NOT NULL,
  last_modified INTEGER NOT NULL,
  FOREIGN KEY (routine_id) REFERENCES Routines (id) ON DELETE CASCADE,
  FOREIGN KEY (workout_id) REFERENCES Workouts (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Active_Session (
  id TEXT PRIMARY KEY NOT NULL,
  workout_id TEXT NOT NULL,
  timestamp INTEGER NOT NULL,
  is_swapped INTEGER NOT NULL DEFAULT 0,
  draft_data TEXT NOT NULL,
  last_modified INTEGER NOT NULL,
  FOREIGN KEY (workout_id) REFERENCES Workouts (id)
);

CREATE TABLE IF NOT EXISTS Logged_Sessions (
  id TEXT PRIMARY KEY NOT NULL,
  workout_id TEXT NOT NULL,
  timestamp INTEGER NOT NULL,
  is_swapped INTEGER NOT NULL DEFAULT 0,
  last_modified INTEGER NOT NULL,
  FOREIGN KEY (workout_id) REFERENCES Workouts (id)
);

CREATE TABLE IF NOT EXISTS Logged_Sets (
  id TEXT PRIMARY KEY NOT NULL,
  session_id TEXT NOT NULL,
  exercise_id TEXT NOT NULL,
  weight REAL,
  reps INTEGER,
  time_ms INTEGER,
  is_skipped INTEGER NOT NULL DEFAULT 0,
  last_modified INTEGER NOT NULL,
  FOREIGN KEY (session_id) REFERENCES Logged_Sessions (id) ON DELETE CASCADE,
  FOREIGN KEY (exercise_id) REFERENCES Exercises (id)
);

CREATE TABLE IF NOT EXISTS User_Settings (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  active_routine_id TEXT,
  unit_system TEXT NOT NULL DEFAULT 'KG',
  rest_timer_enabled INTEGER NOT NULL DEFAULT 1,
  rest_timer_sound INTEGER NOT NULL DEFAULT 1,
  default_rest_duration INTEGER NOT NULL DEFAULT 90,
  calendar_sync_enabled INTEGER NOT NULL DEFAULT 0,
  sync_history_limit_months INTEGER NOT NULL DEFAULT 12,
  last_sync_timestamp INTEGER,
  vault_connection_token TEXT,
  last_modified INTEGER NOT NULL,
  FOREIGN KEY (active_routine_id) REFERENCES Routines (id) ON DELETE SET NULL
);
";
