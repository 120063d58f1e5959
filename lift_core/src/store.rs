//! SQLite-backed persistent store.
//!
//! All durable entities live here: exercises, workout templates,
//! routines, logged history, user settings, and the singleton active
//! session row. Multi-statement operations run inside a transaction so
//! they either all apply or none do; the at-most-one-active-session
//! invariant is enforced at the write boundary, not by convention.

use crate::schema::SCHEMA;
use crate::types::*;
use crate::{Error, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::path::Path;
use std::sync::Mutex;

impl ToSql for ExerciseType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ExerciseType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        ExerciseType::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

impl ToSql for MuscleGroup {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MuscleGroup {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        MuscleGroup::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

impl ToSql for RoutineMode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RoutineMode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        RoutineMode::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

impl ToSql for UnitSystem {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for UnitSystem {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        UnitSystem::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

/// Summary of a committed session, returned by the finish operation
#[derive(Clone, Debug)]
pub struct CommitOutcome {
    pub session_id: String,
    pub logged_sets: usize,
    /// Routine whose cycle count was advanced, if one was active
    pub routine_advanced: Option<String>,
}

/// Local SQLite store.
/// Thread-safe: wraps the connection in a Mutex so it can be shared via
/// `Arc<Store>`.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the store at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store for tests and scratch work
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT OR IGNORE INTO User_Settings (id, last_modified) VALUES (1, ?1)",
            params![now_millis()],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("store mutex poisoned")
    }

    // ── Exercises ──────────────────────────────────────────────────────

    pub fn insert_exercise(&self, exercise: &Exercise) -> Result<()> {
        self.conn().execute(
            "INSERT INTO Exercises \
             (id, name, description, type, muscle_group, is_base_content, last_modified) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                exercise.id,
                exercise.name,
                exercise.description,
                exercise.exercise_type,
                exercise.muscle_group,
                exercise.is_base_content,
                exercise.last_modified,
            ],
        )?;
        Ok(())
    }

    pub fn update_exercise(&self, exercise: &Exercise) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE Exercises SET name = ?2, description = ?3, type = ?4, \
             muscle_group = ?5, last_modified = ?6 WHERE id = ?1",
            params![
                exercise.id,
                exercise.name,
                exercise.description,
                exercise.exercise_type,
                exercise.muscle_group,
                now_millis(),
            ],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "exercise",
                id: exercise.id.clone(),
            });
        }
        Ok(())
    }

    /// Delete an exercise. Base content is protected here, at the policy
    /// layer; the schema itself would allow the delete.
    pub fn delete_exercise(&self, id: &str) -> Result<()> {
        let exercise = self.get_exercise(id)?;
        if exercise.is_base_content {
            return Err(Error::BaseContentProtected {
                exercise_id: id.to_string(),
            });
        }
        self.conn()
            .execute("DELETE FROM Exercises WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn get_exercise(&self, id: &str) -> Result<Exercise> {
        self.conn()
            .query_row(
                "SELECT id, name, description, type, muscle_group, is_base_content, \
                 last_modified FROM Exercises WHERE id = ?1",
                params![id],
                row_to_exercise,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "exercise",
                id: id.to_string(),
            })
    }

    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, type, muscle_group, is_base_content, \
             last_modified FROM Exercises ORDER BY name ASC",
        )?;
        let rows = stmt.query_map([], row_to_exercise)?;
        collect(rows)
    }

    /// Resolve an exercise by id or (case-insensitive) name
    pub fn find_exercise(&self, id_or_name: &str) -> Result<Exercise> {
        self.conn()
            .query_row(
                "SELECT id, name, description, type, muscle_group, is_base_content, \
                 last_modified FROM Exercises \
                 WHERE id = ?1 OR name = ?1 COLLATE NOCASE",
                params![id_or_name],
                row_to_exercise,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "exercise",
                id: id_or_name.to_string(),
            })
    }

    // ── Workouts ───────────────────────────────────────────────────────

    /// Insert a workout template with its ordered exercise assignments
    /// in one transaction.
    pub fn insert_workout(
        &self,
        name: &str,
        entries: &[(String, u32, u32)],
    ) -> Result<Workout> {
        let workout = Workout {
            id: new_id(),
            name: name.to_string(),
            last_modified: now_millis(),
        };
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO Workouts (id, name, last_modified) VALUES (?1, ?2, ?3)",
            params![workout.id, workout.name, workout.last_modified],
        )?;
        for (index, (exercise_id, target_sets, target_reps)) in entries.iter().enumerate() {
            tx.execute(
                "INSERT INTO Workout_Exercises \
                 (id, workout_id, exercise_id, order_index, target_sets, target_reps, last_modified) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    new_id(),
                    workout.id,
                    exercise_id,
                    index as i64,
                    target_sets,
                    target_reps,
                    workout.last_modified,
                ],
            )?;
        }
        tx.commit()?;
        Ok(workout)
    }

    /// Delete a workout; its exercise assignments cascade with it.
    pub fn delete_workout(&self, id: &str) -> Result<()> {
        let affected = self
            .conn()
            .execute("DELETE FROM Workouts WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "workout",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_workout(&self, id: &str) -> Result<Workout> {
        self.conn()
            .query_row(
                "SELECT id, name, last_modified FROM Workouts WHERE id = ?1",
                params![id],
                row_to_workout,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "workout",
                id: id.to_string(),
            })
    }

    pub fn list_workouts(&self) -> Result<Vec<Workout>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, name, last_modified FROM Workouts ORDER BY name ASC")?;
        let rows = stmt.query_map([], row_to_workout)?;
        collect(rows)
    }

    /// Resolve a workout by id or (case-insensitive) name
    pub fn find_workout(&self, id_or_name: &str) -> Result<Workout> {
        self.conn()
            .query_row(
                "SELECT id, name, last_modified FROM Workouts \
                 WHERE id = ?1 OR name = ?1 COLLATE NOCASE",
                params![id_or_name],
                row_to_workout,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "workout",
                id: id_or_name.to_string(),
            })
    }

    pub fn workout_exercises(&self, workout_id: &str) -> Result<Vec<WorkoutExercise>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, workout_id, exercise_id, order_index, target_sets, target_reps, \
             last_modified FROM Workout_Exercises \
             WHERE workout_id = ?1 ORDER BY order_index ASC",
        )?;
        let rows = stmt.query_map(params![workout_id], |row| {
            Ok(WorkoutExercise {
                id: row.get(0)?,
                workout_id: row.get(1)?,
                exercise_id: row.get(2)?,
                order_index: row.get(3)?,
                target_sets: row.get(4)?,
                target_reps: row.get(5)?,
                last_modified: row.get(6)?,
            })
        })?;
        collect(rows)
    }

    /// Resolve a workout's assignments into the exercise list handed to
    /// the session state machine.
    pub fn workout_plan(&self, workout_id: &str) -> Result<Vec<PlannedExercise>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT e.id, e.name, e.description, e.type, e.muscle_group, \
                    e.is_base_content, e.last_modified, we.target_sets, we.target_reps \
             FROM Workout_Exercises we \
             JOIN Exercises e ON e.id = we.exercise_id \
             WHERE we.workout_id = ?1 ORDER BY we.order_index ASC",
        )?;
        let rows = stmt.query_map(params![workout_id], |row| {
            Ok(PlannedExercise {
                exercise: Exercise {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    exercise_type: row.get(3)?,
                    muscle_group: row.get(4)?,
                    is_base_content: row.get(5)?,
                    last_modified: row.get(6)?,
                },
                target_sets: row.get(7)?,
                target_reps: row.get(8)?,
            })
        })?;
        collect(rows)
    }

    // ── Routines ───────────────────────────────────────────────────────

    /// Insert a routine with its ordered workout mappings in one
    /// transaction.
    pub fn insert_routine(
        &self,
        name: &str,
        mode: RoutineMode,
        duration: i64,
        workout_ids: &[String],
    ) -> Result<Routine> {
        let routine = Routine {
            id: new_id(),
            name: name.to_string(),
            mode,
            duration,
            cycle_count: 0,
            last_modified: now_millis(),
        };
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO Routines (id, name, mode, duration, cycle_count, last_modified) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![routine.id, routine.name, routine.mode, routine.duration, routine.last_modified],
        )?;
        for (index, workout_id) in workout_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO Routine_Workouts \
                 (id, routine_id, workout_id, order_index, last_modified) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![new_id(), routine.id, workout_id, index as i64, routine.last_modified],
            )?;
        }
        tx.commit()?;
        Ok(routine)
    }

    pub fn delete_routine(&self, id: &str) -> Result<()> {
        let affected = self
            .conn()
            .execute("DELETE FROM Routines WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "routine",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_routine(&self, id: &str) -> Result<Routine> {
        self.conn()
            .query_row(
                "SELECT id, name, mode, duration, cycle_count, last_modified \
                 FROM Routines WHERE id = ?1",
                params![id],
                row_to_routine,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "routine",
                id: id.to_string(),
            })
    }

    pub fn list_routines(&self) -> Result<Vec<Routine>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, mode, duration, cycle_count, last_modified \
             FROM Routines ORDER BY name ASC",
        )?;
        let rows = stmt.query_map([], row_to_routine)?;
        collect(rows)
    }

    pub fn routine_workouts(&self, routine_id: &str) -> Result<Vec<RoutineWorkout>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, routine_id, workout_id, order_index, last_modified \
             FROM Routine_Workouts WHERE routine_id = ?1 ORDER BY order_index ASC",
        )?;
        let rows = stmt.query_map(params![routine_id], |row| {
            Ok(RoutineWorkout {
                id: row.get(0)?,
                routine_id: row.get(1)?,
                workout_id: row.get(2)?,
                order_index: row.get(3)?,
                last_modified: row.get(4)?,
            })
        })?;
        collect(rows)
    }

    // ── Settings ───────────────────────────────────────────────────────

    pub fn settings(&self) -> Result<UserSettings> {
        Ok(self.conn().query_row(
            "SELECT id, active_routine_id, unit_system, rest_timer_enabled, \
             rest_timer_sound, default_rest_duration, calendar_sync_enabled, \
             sync_history_limit_months, last_sync_timestamp, vault_connection_token, \
             last_modified FROM User_Settings WHERE id = 1",
            [],
            row_to_settings,
        )?)
    }

    pub fn set_active_routine(&self, routine_id: Option<&str>) -> Result<()> {
        self.conn().execute(
            "UPDATE User_Settings SET active_routine_id = ?1, last_modified = ?2 WHERE id = 1",
            params![routine_id, now_millis()],
        )?;
        Ok(())
    }

    pub fn update_settings(&self, settings: &UserSettings) -> Result<()> {
        self.conn().execute(
            "UPDATE User_Settings SET active_routine_id = ?1, unit_system = ?2, \
             rest_timer_enabled = ?3, rest_timer_sound = ?4, default_rest_duration = ?5, \
             calendar_sync_enabled = ?6, sync_history_limit_months = ?7, \
             last_sync_timestamp = ?8, vault_connection_token = ?9, last_modified = ?10 \
             WHERE id = 1",
            params![
                settings.active_routine_id,
                settings.unit_system,
                settings.rest_timer_enabled,
                settings.rest_timer_sound,
                settings.default_rest_duration,
                settings.calendar_sync_enabled,
                settings.sync_history_limit_months,
                settings.last_sync_timestamp,
                settings.vault_connection_token,
                now_millis(),
            ],
        )?;
        Ok(())
    }

    // ── Active session ─────────────────────────────────────────────────

    /// The singleton active session row, with its raw draft blob.
    /// Decoding (and corrupt-blob recovery) is the caller's concern.
    pub fn active_session(&self) -> Result<Option<(ActiveSession, String)>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, workout_id, timestamp, is_swapped, draft_data, last_modified \
                 FROM Active_Session",
                [],
                |row| {
                    Ok((
                        ActiveSession {
                            id: row.get(0)?,
                            workout_id: row.get(1)?,
                            started_at: row.get(2)?,
                            is_swapped: row.get(3)?,
                            last_modified: row.get(5)?,
                        },
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?)
    }

    /// Create the active session row. Fails with [`Error::SessionActive`]
    /// if a row already exists; the check and insert share a transaction.
    pub fn insert_active_session(
        &self,
        session: &ActiveSession,
        drafts: &DraftMap,
    ) -> Result<()> {
        let blob = serde_json::to_string(drafts)?;
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let existing: i64 =
            tx.query_row("SELECT COUNT(*) FROM Active_Session", [], |row| row.get(0))?;
        if existing > 0 {
            return Err(Error::SessionActive);
        }
        tx.execute(
            "INSERT INTO Active_Session \
             (id, workout_id, timestamp, is_swapped, draft_data, last_modified) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.id,
                session.workout_id,
                session.started_at,
                session.is_swapped,
                blob,
                session.last_modified,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Checkpoint the full draft snapshot. One UPDATE, so the write is
    /// atomic; last write wins.
    pub fn save_draft_data(&self, session_id: &str, drafts: &DraftMap) -> Result<()> {
        let blob = serde_json::to_string(drafts)?;
        let affected = self.conn().execute(
            "UPDATE Active_Session SET draft_data = ?2, last_modified = ?3 WHERE id = ?1",
            params![session_id, blob, now_millis()],
        )?;
        if affected == 0 {
            return Err(Error::NoActiveSession);
        }
        Ok(())
    }

    /// Checkpoint the snapshot and mark the session swapped.
    pub fn save_swapped_draft_data(&self, session_id: &str, drafts: &DraftMap) -> Result<()> {
        let blob = serde_json::to_string(drafts)?;
        let affected = self.conn().execute(
            "UPDATE Active_Session SET draft_data = ?2, is_swapped = 1, last_modified = ?3 \
             WHERE id = ?1",
            params![session_id, blob, now_millis()],
        )?;
        if affected == 0 {
            return Err(Error::NoActiveSession);
        }
        Ok(())
    }

    pub fn delete_active_session(&self, session_id: &str) -> Result<()> {
        let affected = self
            .conn()
            .execute("DELETE FROM Active_Session WHERE id = ?1", params![session_id])?;
        if affected == 0 {
            return Err(Error::NoActiveSession);
        }
        Ok(())
    }

    /// Atomically convert the active session into permanent history:
    /// one logged session, one logged set per completed-or-skipped draft
    /// entry, a cycle-count increment when a routine is active, and the
    /// active row's deletion. All statements share one transaction.
    pub fn commit_session(
        &self,
        session: &ActiveSession,
        drafts: &DraftMap,
    ) -> Result<CommitOutcome> {
        let now = now_millis();
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO Logged_Sessions (id, workout_id, timestamp, is_swapped, last_modified) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![session.id, session.workout_id, session.started_at, session.is_swapped, now],
        )?;

        let mut logged_sets = 0usize;
        for (exercise_id, sets) in drafts {
            for set in sets.iter().filter(|s| s.is_loggable()) {
                tx.execute(
                    "INSERT INTO Logged_Sets \
                     (id, session_id, exercise_id, weight, reps, time_ms, is_skipped, last_modified) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        new_id(),
                        session.id,
                        exercise_id,
                        set.weight,
                        set.reps,
                        set.time_ms,
                        set.is_skipped,
                        now,
                    ],
                )?;
                logged_sets += 1;
            }
        }

        let active_routine_id: Option<String> = tx.query_row(
            "SELECT active_routine_id FROM User_Settings WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        if let Some(ref routine_id) = active_routine_id {
            tx.execute(
                "UPDATE Routines SET cycle_count = cycle_count + 1, last_modified = ?2 \
                 WHERE id = ?1",
                params![routine_id, now],
            )?;
        }

        let affected =
            tx.execute("DELETE FROM Active_Session WHERE id = ?1", params![session.id])?;
        if affected == 0 {
            return Err(Error::NoActiveSession);
        }

        tx.commit()?;
        Ok(CommitOutcome {
            session_id: session.id.clone(),
            logged_sets,
            routine_advanced: active_routine_id,
        })
    }

    // ── Logged history ─────────────────────────────────────────────────

    pub fn list_logged_sessions(&self, limit: Option<usize>) -> Result<Vec<LoggedSession>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, workout_id, timestamp, is_swapped, last_modified \
             FROM Logged_Sessions ORDER BY timestamp DESC LIMIT ?1",
        )?;
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let rows = stmt.query_map(params![limit], |row| {
            Ok(LoggedSession {
                id: row.get(0)?,
                workout_id: row.get(1)?,
                performed_at: row.get(2)?,
                is_swapped: row.get(3)?,
                last_modified: row.get(4)?,
            })
        })?;
        collect(rows)
    }

    pub fn logged_sets(&self, session_id: &str) -> Result<Vec<LoggedSet>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, session_id, exercise_id, weight, reps, time_ms, is_skipped, \
             last_modified FROM Logged_Sets WHERE session_id = ?1",
        )?;
        let rows = stmt.query_map(params![session_id], row_to_logged_set)?;
        collect(rows)
    }

    pub fn logged_set_count(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM Logged_Sets", [], |row| row.get(0))?)
    }

    pub fn active_session_count(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM Active_Session", [], |row| row.get(0))?)
    }
}

fn collect<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Result<Vec<T>> {
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

fn row_to_exercise(row: &rusqlite::Row) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        exercise_type: row.get(3)?,
        muscle_group: row.get(4)?,
        is_base_content: row.get(5)?,
        last_modified: row.get(6)?,
    })
}

fn row_to_workout(row: &rusqlite::Row) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: row.get(0)?,
        name: row.get(1)?,
        last_modified: row.get(2)?,
    })
}

fn row_to_routine(row: &rusqlite::Row) -> rusqlite::Result<Routine> {
    Ok(Routine {
        id: row.get(0)?,
        name: row.get(1)?,
        mode: row.get(2)?,
        duration: row.get(3)?,
        cycle_count: row.get(4)?,
        last_modified: row.get(5)?,
    })
}

fn row_to_logged_set(row: &rusqlite::Row) -> rusqlite::Result<LoggedSet> {
    Ok(LoggedSet {
        id: row.get(0)?,
        session_id: row.get(1)?,
        exercise_id: row.get(2)?,
        weight: row.get(3)?,
        reps: row.get(4)?,
        time_ms: row.get(5)?,
        is_skipped: row.get(6)?,
        last_modified: row.get(7)?,
    })
}

fn row_to_settings(row: &rusqlite::Row) -> rusqlite::Result<UserSettings> {
    Ok(UserSettings {
        id: row.get(0)?,
        active_routine_id: row.get(1)?,
        unit_system: row.get(2)?,
        rest_timer_enabled: row.get(3)?,
        rest_timer_sound: row.get(4)?,
        default_rest_duration: row.get(5)?,
        calendar_sync_enabled: row.get(6)?,
        sync_history_limit_months: row.get(7)?,
        last_sync_timestamp: row.get(8)?,
        vault_connection_token: row.get(9)?,
        last_modified: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_exercise(name: &str) -> Exercise {
        Exercise {
            id: new_id(),
            name: name.into(),
            description: String::new(),
            exercise_type: ExerciseType::Strength,
            muscle_group: MuscleGroup::Chest,
            is_base_content: false,
            last_modified: now_millis(),
        }
    }

    fn store_with_workout() -> (Store, Workout, Exercise) {
        let store = Store::open_in_memory().unwrap();
        let exercise = test_exercise("Bench Press");
        store.insert_exercise(&exercise).unwrap();
        let workout = store
            .insert_workout("Push Day", &[(exercise.id.clone(), 3, 10)])
            .unwrap();
        (store, workout, exercise)
    }

    #[test]
    fn test_open_creates_settings_row() {
        let store = Store::open_in_memory().unwrap();
        let settings = store.settings().unwrap();
        assert_eq!(settings.id, 1);
        assert_eq!(settings.unit_system, UnitSystem::Kg);
        assert!(settings.active_routine_id.is_none());
    }

    #[test]
    fn test_settings_update_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let mut settings = store.settings().unwrap();
        settings.unit_system = UnitSystem::Lbs;
        settings.rest_timer_enabled = false;
        settings.default_rest_duration = 120;
        store.update_settings(&settings).unwrap();

        let loaded = store.settings().unwrap();
        assert_eq!(loaded.unit_system, UnitSystem::Lbs);
        assert!(!loaded.rest_timer_enabled);
        assert_eq!(loaded.default_rest_duration, 120);
    }

    #[test]
    fn test_exercise_crud() {
        let store = Store::open_in_memory().unwrap();
        let mut exercise = test_exercise("Squat");
        store.insert_exercise(&exercise).unwrap();

        exercise.name = "Back Squat".into();
        store.update_exercise(&exercise).unwrap();
        assert_eq!(store.get_exercise(&exercise.id).unwrap().name, "Back Squat");

        store.delete_exercise(&exercise.id).unwrap();
        assert!(matches!(
            store.get_exercise(&exercise.id),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_base_content_delete_protected() {
        let store = Store::open_in_memory().unwrap();
        let mut exercise = test_exercise("Deadlift");
        exercise.is_base_content = true;
        store.insert_exercise(&exercise).unwrap();

        let result = store.delete_exercise(&exercise.id);
        assert!(matches!(result, Err(Error::BaseContentProtected { .. })));
        assert!(store.get_exercise(&exercise.id).is_ok());
    }

    #[test]
    fn test_workout_delete_cascades_assignments() {
        let (store, workout, _) = store_with_workout();
        assert_eq!(store.workout_exercises(&workout.id).unwrap().len(), 1);

        store.delete_workout(&workout.id).unwrap();
        assert!(store.workout_exercises(&workout.id).unwrap().is_empty());
    }

    #[test]
    fn test_exercise_delete_cascades_assignments() {
        let (store, workout, exercise) = store_with_workout();
        store.delete_exercise(&exercise.id).unwrap();
        assert!(store.workout_exercises(&workout.id).unwrap().is_empty());
    }

    #[test]
    fn test_workout_plan_resolves_in_order() {
        let store = Store::open_in_memory().unwrap();
        let a = test_exercise("A");
        let b = test_exercise("B");
        store.insert_exercise(&a).unwrap();
        store.insert_exercise(&b).unwrap();
        let workout = store
            .insert_workout(
                "Full Body",
                &[(b.id.clone(), 5, 5), (a.id.clone(), 3, 12)],
            )
            .unwrap();

        let plan = store.workout_plan(&workout.id).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].exercise.id, b.id);
        assert_eq!(plan[0].target_sets, 5);
        assert_eq!(plan[1].exercise.id, a.id);
        assert_eq!(plan[1].target_reps, 12);
    }

    #[test]
    fn test_routine_mappings_ordered() {
        let (store, workout, _) = store_with_workout();
        let second = store.insert_workout("Pull Day", &[]).unwrap();
        let routine = store
            .insert_routine(
                "PPL",
                RoutineMode::Async,
                6,
                &[workout.id.clone(), second.id.clone()],
            )
            .unwrap();

        let mappings = store.routine_workouts(&routine.id).unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].workout_id, workout.id);
        assert_eq!(mappings[0].order_index, 0);
        assert_eq!(mappings[1].workout_id, second.id);
    }

    #[test]
    fn test_routine_delete_cascades_mappings() {
        let (store, workout, _) = store_with_workout();
        let routine = store
            .insert_routine("Solo", RoutineMode::Weekly, 1, &[workout.id.clone()])
            .unwrap();
        store.delete_routine(&routine.id).unwrap();
        assert!(store.routine_workouts(&routine.id).unwrap().is_empty());
        // The mapped workout itself survives
        assert!(store.get_workout(&workout.id).is_ok());
    }

    #[test]
    fn test_insert_active_session_rejects_second_row() {
        let (store, workout, exercise) = store_with_workout();
        let drafts: DraftMap =
            [(exercise.id.clone(), vec![SetDraft::with_target_reps(10)])].into();
        let session = ActiveSession {
            id: new_id(),
            workout_id: workout.id.clone(),
            started_at: now_millis(),
            is_swapped: false,
            last_modified: now_millis(),
        };
        store.insert_active_session(&session, &drafts).unwrap();

        let second = ActiveSession {
            id: new_id(),
            ..session.clone()
        };
        assert!(matches!(
            store.insert_active_session(&second, &drafts),
            Err(Error::SessionActive)
        ));
        assert_eq!(store.active_session_count().unwrap(), 1);
        assert_eq!(store.active_session().unwrap().unwrap().0.id, session.id);
    }

    #[test]
    fn test_commit_session_increments_cycle_only_when_routine_active() {
        let (store, workout, exercise) = store_with_workout();
        let routine = store
            .insert_routine("Linear", RoutineMode::Async, 4, &[workout.id.clone()])
            .unwrap();

        let mut drafts: DraftMap = DraftMap::new();
        let mut set = SetDraft::with_target_reps(10);
        set.is_completed = true;
        drafts.insert(exercise.id.clone(), vec![set]);

        // No routine active: cycle count untouched
        let session = ActiveSession {
            id: new_id(),
            workout_id: workout.id.clone(),
            started_at: now_millis(),
            is_swapped: false,
            last_modified: now_millis(),
        };
        store.insert_active_session(&session, &drafts).unwrap();
        let outcome = store.commit_session(&session, &drafts).unwrap();
        assert!(outcome.routine_advanced.is_none());
        assert_eq!(store.get_routine(&routine.id).unwrap().cycle_count, 0);

        // Routine active: exactly one increment
        store.set_active_routine(Some(&routine.id)).unwrap();
        let session = ActiveSession {
            id: new_id(),
            workout_id: workout.id.clone(),
            started_at: now_millis(),
            is_swapped: false,
            last_modified: now_millis(),
        };
        store.insert_active_session(&session, &drafts).unwrap();
        let outcome = store.commit_session(&session, &drafts).unwrap();
        assert_eq!(outcome.routine_advanced.as_deref(), Some(routine.id.as_str()));
        assert_eq!(store.get_routine(&routine.id).unwrap().cycle_count, 1);
    }

    #[test]
    fn test_commit_preserves_session_identity() {
        let (store, workout, exercise) = store_with_workout();
        let mut set = SetDraft::with_target_reps(10);
        set.is_skipped = true;
        let drafts: DraftMap = [(exercise.id.clone(), vec![set])].into();

        let session = ActiveSession {
            id: new_id(),
            workout_id: workout.id.clone(),
            started_at: now_millis(),
            is_swapped: true,
            last_modified: now_millis(),
        };
        store.insert_active_session(&session, &drafts).unwrap();
        store.commit_session(&session, &drafts).unwrap();

        let logged = store.list_logged_sessions(None).unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].id, session.id);
        assert!(logged[0].is_swapped);
        assert_eq!(store.logged_sets(&session.id).unwrap().len(), 1);
        assert_eq!(store.active_session_count().unwrap(), 0);
    }
}
