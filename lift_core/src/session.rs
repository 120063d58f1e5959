//! Active-session state machine.
//!
//! Tracks the single in-progress workout: Idle until `start`, Active
//! while draft set data is being mutated, back to Idle through `finish`
//! (draft converted to permanent history) or `discard` (draft
//! destroyed). Every mutation checkpoints the full draft snapshot so a
//! process restart can `resume` with nothing lost.
//!
//! In-memory state is only updated after the corresponding storage write
//! succeeds, so a failed transaction leaves both layers unchanged.

use crate::store::{CommitOutcome, Store};
use crate::types::*;
use crate::{Error, Result};
use std::sync::Arc;

/// State machine over the singleton active session
pub struct SessionTracker {
    store: Arc<Store>,
    active: Option<ActiveSession>,
    drafts: DraftMap,
}

impl SessionTracker {
    /// Create a tracker and load any persisted session from the store
    pub fn new(store: Arc<Store>) -> Result<Self> {
        let mut tracker = Self {
            store,
            active: None,
            drafts: DraftMap::new(),
        };
        tracker.resume()?;
        Ok(tracker)
    }

    /// The in-progress session, if any
    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Draft set data for the in-progress session
    pub fn draft_sets(&self) -> &DraftMap {
        &self.drafts
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a session for `workout` with the given exercise list.
    ///
    /// Fails with [`Error::SessionActive`] while a session exists; the
    /// caller decides whether to discard and owns that confirmation.
    /// One draft entry per target set is pre-filled with the target rep
    /// count.
    pub fn start(&mut self, workout: &Workout, planned: &[PlannedExercise]) -> Result<()> {
        if self.active.is_some() {
            return Err(Error::SessionActive);
        }
        if planned.is_empty() {
            return Err(Error::EmptyExerciseList);
        }
        if let Some(bad) = planned.iter().find(|p| p.target_sets == 0) {
            return Err(Error::InvalidTargets {
                exercise_id: bad.exercise.id.clone(),
            });
        }

        let mut drafts = DraftMap::new();
        for entry in planned {
            let sets = (0..entry.target_sets)
                .map(|_| SetDraft::with_target_reps(entry.target_reps))
                .collect();
            drafts.insert(entry.exercise.id.clone(), sets);
        }

        let now = now_millis();
        let session = ActiveSession {
            id: new_id(),
            workout_id: workout.id.clone(),
            started_at: now,
            is_swapped: false,
            last_modified: now,
        };

        self.store.insert_active_session(&session, &drafts)?;
        tracing::info!(
            "Started session {} for workout '{}' ({} exercises)",
            session.id,
            workout.name,
            planned.len()
        );

        self.active = Some(session);
        self.drafts = drafts;
        Ok(())
    }

    /// Replace the full draft array for one exercise and checkpoint the
    /// snapshot. Safe at any call frequency; last write wins per
    /// exercise, other exercises' drafts are untouched.
    pub fn log_set(&mut self, exercise_id: &str, sets: Vec<SetDraft>) -> Result<()> {
        let session = self.active.as_ref().ok_or(Error::NoActiveSession)?;
        if !self.drafts.contains_key(exercise_id) {
            return Err(Error::ExerciseNotInSession {
                exercise_id: exercise_id.to_string(),
            });
        }

        let mut next = self.drafts.clone();
        next.insert(exercise_id.to_string(), sets);
        self.store.save_draft_data(&session.id, &next)?;

        self.drafts = next;
        Ok(())
    }

    /// Move the draft array from `old_id` to `new_id`, clearing the
    /// completion flag on every entry; weight, reps, time and skip state
    /// survive the move. Marks the session swapped.
    pub fn swap_exercise(&mut self, old_id: &str, new_id: &str) -> Result<()> {
        let session = self.active.as_ref().ok_or(Error::NoActiveSession)?;
        let Some(sets) = self.drafts.get(old_id) else {
            return Err(Error::ExerciseNotInSession {
                exercise_id: old_id.to_string(),
            });
        };

        let moved: Vec<SetDraft> = sets
            .iter()
            .cloned()
            .map(|mut set| {
                set.is_completed = false;
                set
            })
            .collect();

        let mut next = self.drafts.clone();
        next.remove(old_id);
        next.insert(new_id.to_string(), moved);
        self.store.save_swapped_draft_data(&session.id, &next)?;
        tracing::info!("Swapped exercise {} for {} in session {}", old_id, new_id, session.id);

        self.drafts = next;
        if let Some(ref mut active) = self.active {
            active.is_swapped = true;
        }
        Ok(())
    }

    /// Commit the session: log every completed-or-skipped draft entry,
    /// advance the active routine's cycle count, delete the active row —
    /// all or nothing. Entries with neither flag are dropped.
    pub fn finish(&mut self) -> Result<CommitOutcome> {
        let session = self.active.as_ref().ok_or(Error::NoActiveSession)?;

        let outcome = self.store.commit_session(session, &self.drafts)?;
        tracing::info!(
            "Committed session {} ({} sets logged)",
            outcome.session_id,
            outcome.logged_sets
        );

        self.active = None;
        self.drafts.clear();
        Ok(outcome)
    }

    /// Destroy the session and its draft data; nothing is logged.
    /// Destructive — the presentation layer confirms before calling.
    pub fn discard(&mut self) -> Result<()> {
        let session = self.active.as_ref().ok_or(Error::NoActiveSession)?;

        self.store.delete_active_session(&session.id)?;
        tracing::info!("Discarded session {}", session.id);

        self.active = None;
        self.drafts.clear();
        Ok(())
    }

    /// Reload state from storage. Cold-start recovery: set data entered
    /// before a crash comes back verbatim. A corrupt draft blob is
    /// surfaced as a warning and recovered as an empty map rather than
    /// failing the load.
    pub fn resume(&mut self) -> Result<()> {
        match self.store.active_session()? {
            Some((session, blob)) => {
                let drafts = match serde_json::from_str::<DraftMap>(&blob) {
                    Ok(drafts) => drafts,
                    Err(e) => {
                        tracing::warn!(
                            "Draft data for session {} is unreadable ({}); resuming with empty drafts",
                            session.id,
                            e
                        );
                        DraftMap::new()
                    }
                };
                tracing::debug!("Resumed session {} ({} exercises)", session.id, drafts.len());
                self.active = Some(session);
                self.drafts = drafts;
            }
            None => {
                self.active = None;
                self.drafts.clear();
            }
        }
        Ok(())
    }
}
