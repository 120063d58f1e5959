//! CSV export of logged history.
//!
//! Writes one row per logged set, joined with its parent session and
//! resolved workout/exercise names, to a caller-supplied path.

use crate::store::Store;
use crate::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    session_id: String,
    workout: String,
    performed_at: String,
    exercise: String,
    weight: Option<f64>,
    reps: Option<u32>,
    time_ms: Option<i64>,
    is_skipped: bool,
}

fn format_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}

/// Export all logged sessions and their sets to `path`.
///
/// Returns the number of set rows written. Headers are written once;
/// the file is flushed and synced before returning.
pub fn export_history(store: &Store, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let workout_names: HashMap<String, String> = store
        .list_workouts()?
        .into_iter()
        .map(|w| (w.id, w.name))
        .collect();
    let exercise_names: HashMap<String, String> = store
        .list_exercises()?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    let mut writer = csv::Writer::from_writer(File::create(path)?);
    let mut count = 0usize;

    for session in store.list_logged_sessions(None)? {
        let workout = workout_names
            .get(&session.workout_id)
            .cloned()
            .unwrap_or_else(|| session.workout_id.clone());
        let performed_at = format_millis(session.performed_at);

        for set in store.logged_sets(&session.id)? {
            let exercise = exercise_names
                .get(&set.exercise_id)
                .cloned()
                .unwrap_or_else(|| set.exercise_id.clone());
            writer.serialize(CsvRow {
                session_id: session.id.clone(),
                workout: workout.clone(),
                performed_at: performed_at.clone(),
                exercise,
                weight: set.weight,
                reps: set.reps,
                time_ms: set.time_ms,
                is_skipped: set.is_skipped,
            })?;
            count += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} logged sets to {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionTracker;
    use crate::types::*;
    use std::sync::Arc;

    #[test]
    fn test_export_writes_one_row_per_logged_set() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let store = Arc::new(Store::open_in_memory().unwrap());
        let exercise = Exercise {
            id: new_id(),
            name: "Bench Press".into(),
            description: String::new(),
            exercise_type: ExerciseType::Strength,
            muscle_group: MuscleGroup::Chest,
            is_base_content: false,
            last_modified: now_millis(),
        };
        store.insert_exercise(&exercise).unwrap();
        let workout = store
            .insert_workout("Push Day", &[(exercise.id.clone(), 2, 10)])
            .unwrap();

        let mut tracker = SessionTracker::new(store.clone()).unwrap();
        let plan = store.workout_plan(&workout.id).unwrap();
        tracker.start(&workout, &plan).unwrap();

        let mut sets = tracker.draft_sets()[&exercise.id].clone();
        sets[0].weight = Some(80.0);
        sets[0].is_completed = true;
        sets[1].is_skipped = true;
        tracker.log_set(&exercise.id, sets).unwrap();
        tracker.finish().unwrap();

        let count = export_history(&store, &csv_path).unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("session_id,workout,"));
        assert_eq!(lines.count(), 2);
        assert!(contents.contains("Bench Press"));
        assert!(contents.contains("Push Day"));
    }

    #[test]
    fn test_export_empty_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let store = Store::open_in_memory().unwrap();
        let count = export_history(&store, &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
    }
}
