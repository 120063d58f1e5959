//! Built-in base content.
//!
//! Seeds the store with a starter set of exercises, workout templates
//! and one routine. Each section is idempotent: it is skipped entirely
//! when any row of its kind already exists, so reseeding an existing
//! database is a no-op.

use crate::store::Store;
use crate::types::*;
use crate::Result;
use once_cell::sync::Lazy;

/// Cached base exercise catalog - built once and reused
static BASE_EXERCISES: Lazy<Vec<Exercise>> = Lazy::new(build_base_exercises);

/// Workout templates over the base catalog: (name, [(exercise id, sets, reps)])
const BASE_WORKOUTS: &[(&str, &[(&str, u32, u32)])] = &[
    (
        "Push Day",
        &[
            ("base_bench_press", 3, 8),
            ("base_ohp", 3, 10),
            ("base_pushdown", 3, 12),
        ],
    ),
    (
        "Pull Day",
        &[
            ("base_row", 3, 8),
            ("base_pullup", 3, 6),
            ("base_curl", 3, 12),
        ],
    ),
    (
        "Leg Day",
        &[
            ("base_squat", 3, 5),
            ("base_rdl", 3, 8),
            ("base_calf_raise", 4, 12),
        ],
    ),
];

fn base_exercise(
    id: &str,
    name: &str,
    description: &str,
    exercise_type: ExerciseType,
    muscle_group: MuscleGroup,
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        exercise_type,
        muscle_group,
        is_base_content: true,
        last_modified: 0,
    }
}

fn build_base_exercises() -> Vec<Exercise> {
    use ExerciseType::*;
    use MuscleGroup::*;
    vec![
        base_exercise(
            "base_bench_press",
            "Bench Press",
            "Barbell press from the chest on a flat bench",
            Strength,
            Chest,
        ),
        base_exercise(
            "base_row",
            "Barbell Row",
            "Hip-hinged barbell pull to the lower chest",
            Strength,
            Back,
        ),
        base_exercise(
            "base_pullup",
            "Pull-up",
            "Overhand-grip hang to chin over bar",
            Bodyweight,
            Back,
        ),
        base_exercise(
            "base_ohp",
            "Overhead Press",
            "Standing barbell press overhead",
            Strength,
            Shoulders,
        ),
        base_exercise(
            "base_curl",
            "Barbell Curl",
            "Standing barbell curl",
            Strength,
            Biceps,
        ),
        base_exercise(
            "base_pushdown",
            "Triceps Pushdown",
            "Cable pushdown with straight bar or rope",
            Strength,
            Triceps,
        ),
        base_exercise(
            "base_squat",
            "Back Squat",
            "High-bar barbell squat to depth",
            Strength,
            LegsQuads,
        ),
        base_exercise(
            "base_rdl",
            "Romanian Deadlift",
            "Hip hinge with minimal knee travel",
            Strength,
            LegsHams,
        ),
        base_exercise(
            "base_calf_raise",
            "Standing Calf Raise",
            "Full-range calf raise, pause at stretch",
            Strength,
            Calves,
        ),
        base_exercise(
            "base_plank",
            "Plank",
            "Front plank hold on forearms",
            Isometric,
            Core,
        ),
        base_exercise(
            "base_treadmill",
            "Treadmill Run",
            "Steady-state run",
            Endurance,
            Cardio,
        ),
    ]
}

/// Seed base content into the store. Returns true if anything was
/// written.
pub fn seed_base_content(store: &Store) -> Result<bool> {
    let mut seeded = false;

    let has_base = store
        .list_exercises()?
        .iter()
        .any(|e| e.is_base_content);
    if !has_base {
        tracing::info!("Seeding {} base exercises", BASE_EXERCISES.len());
        for exercise in BASE_EXERCISES.iter() {
            let mut exercise = exercise.clone();
            exercise.last_modified = now_millis();
            store.insert_exercise(&exercise)?;
        }
        seeded = true;
    }

    // Workout templates reference the base catalog by id, so they are
    // only seeded when that catalog is actually present.
    let catalog_present = BASE_EXERCISES
        .iter()
        .all(|e| store.get_exercise(&e.id).is_ok());
    if catalog_present && store.list_workouts()?.is_empty() {
        tracing::info!("Seeding {} base workouts", BASE_WORKOUTS.len());
        let mut workout_ids = Vec::new();
        for (name, entries) in BASE_WORKOUTS {
            let entries: Vec<(String, u32, u32)> = entries
                .iter()
                .map(|(id, sets, reps)| (id.to_string(), *sets, *reps))
                .collect();
            let workout = store.insert_workout(name, &entries)?;
            workout_ids.push(workout.id);
        }

        if store.list_routines()?.is_empty() {
            tracing::info!("Seeding base routine");
            store.insert_routine("Push Pull Legs", RoutineMode::Async, 6, &workout_ids)?;
        }
        seeded = true;
    }

    Ok(seeded)
}
