//! Routine progression policy.
//!
//! Derives "what workout comes next" from a routine's ordered workout
//! mappings. The two modes index differently:
//! - ASYNC: next in the queue, wrapping — `cycle_count mod mapping_count`
//! - WEEKLY: the slot for the current weekday (Mon = 0 … Sun = 6); an
//!   unmapped weekday is a rest day
//!
//! Pure derivation; cycle advancement happens inside the session commit
//! transaction, never here.

use crate::store::Store;
use crate::types::{NextWorkout, Routine, RoutineMode, RoutineWorkout};
use crate::{Error, Result};
use chrono::{Datelike, Local, Weekday};

/// Slot index for a weekday, Monday-first
fn weekday_slot(day: Weekday) -> i64 {
    day.num_days_from_monday() as i64
}

/// Select the mapping the routine designates for `today`.
///
/// `Ok(None)` is a WEEKLY rest day. An empty mapping list derives
/// nothing in either mode and the caller must fall back.
pub fn select_mapping<'a>(
    routine: &Routine,
    mappings: &'a [RoutineWorkout],
    today: Weekday,
) -> Result<Option<&'a RoutineWorkout>> {
    if mappings.is_empty() {
        return Err(Error::NoWorkoutInRoutine);
    }
    match routine.mode {
        RoutineMode::Async => {
            let index = (routine.cycle_count.rem_euclid(mappings.len() as i64)) as usize;
            Ok(Some(&mappings[index]))
        }
        RoutineMode::Weekly => {
            let slot = weekday_slot(today);
            Ok(mappings.iter().find(|m| m.order_index == slot))
        }
    }
}

/// Derive the next workout from the active routine's configuration.
///
/// Fails with [`Error::NoActiveRoutine`] when settings carry no routine;
/// the caller then selects a workout by other means.
pub fn derive_next_workout(store: &Store, today: Weekday) -> Result<NextWorkout> {
    let settings = store.settings()?;
    let routine_id = settings.active_routine_id.ok_or(Error::NoActiveRoutine)?;

    let routine = store.get_routine(&routine_id)?;
    let mappings = store.routine_workouts(&routine.id)?;

    match select_mapping(&routine, &mappings, today)? {
        Some(mapping) => {
            let workout = store.get_workout(&mapping.workout_id)?;
            tracing::debug!(
                "Routine '{}' derived workout '{}' (cycle {})",
                routine.name,
                workout.name,
                routine.cycle_count
            );
            Ok(NextWorkout::Workout(workout))
        }
        None => {
            tracing::debug!("Routine '{}' has no slot for {:?}: rest day", routine.name, today);
            Ok(NextWorkout::RestDay)
        }
    }
}

/// Convenience wrapper using the local calendar day
pub fn derive_next_workout_today(store: &Store) -> Result<NextWorkout> {
    derive_next_workout(store, Local::now().weekday())
}
