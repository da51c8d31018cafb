use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::TrainedExercise;

/// A workout session owned by a user. Owns its performed exercises.
#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub is_done: bool,
    pub planned_date: DateTime<Utc>,
    pub actual_date: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_duration: Option<Duration>,
    pub total_rest_time: Option<Duration>,
    pub total_exercise_time: Option<Duration>,
    pub rating: Option<i32>,
    pub is_paused: bool,
    pub paused_at: Option<DateTime<Utc>>,
    pub paused_duration: Duration,
    pub exercises: Vec<TrainedExercise>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingState {
    Planned,
    Started,
    Paused,
    Done,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("training is not active")]
    NotActive,
    #[error("training is already completed")]
    AlreadyCompleted,
    #[error("a completed training cannot be reopened")]
    Reopen,
}

/// Row to be inserted for a new training. `actual_date` is only ever set by
/// template instantiation for same-day assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTraining {
    pub user_id: Uuid,
    pub title: String,
    pub planned_date: DateTime<Utc>,
    pub actual_date: Option<DateTime<Utc>>,
    pub total_duration: Option<Duration>,
    pub total_rest_time: Option<Duration>,
    pub total_exercise_time: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTraining {
    pub title: String,
    pub planned_date: Option<DateTime<Utc>>,
    pub total_duration: Option<Duration>,
    pub total_rest_time: Option<Duration>,
    pub total_exercise_time: Option<Duration>,
}

/// Merge-patch for a training; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTraining {
    pub title: Option<String>,
    pub planned_date: Option<DateTime<Utc>>,
    pub total_duration: Option<Duration>,
    pub total_rest_time: Option<Duration>,
    pub total_exercise_time: Option<Duration>,
    pub rating: Option<i32>,
    pub is_done: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerPatch {
    pub total_duration: Option<Duration>,
    pub total_rest_time: Option<Duration>,
    pub total_exercise_time: Option<Duration>,
}

impl Training {
    pub fn state(&self) -> TrainingState {
        if self.is_done {
            TrainingState::Done
        } else if self.started_at.is_none() {
            TrainingState::Planned
        } else if self.is_paused {
            TrainingState::Paused
        } else {
            TrainingState::Started
        }
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Returns `false` when the training had already been started.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Opens a pause interval. Pausing an already paused training is a no-op.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<bool, TransitionError> {
        if !self.is_started() {
            return Err(TransitionError::NotActive);
        }
        if self.is_done {
            return Err(TransitionError::AlreadyCompleted);
        }
        if self.is_paused {
            return Ok(false);
        }
        self.is_paused = true;
        self.paused_at = Some(now);
        Ok(true)
    }

    /// Closes the open pause interval and adds it to `paused_duration`.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<bool, TransitionError> {
        if !self.is_started() {
            return Err(TransitionError::NotActive);
        }
        if !self.is_paused {
            return Ok(false);
        }
        self.close_pause(now);
        Ok(true)
    }

    fn close_pause(&mut self, now: DateTime<Utc>) {
        if let Some(paused_at) = self.paused_at.take() {
            let elapsed = now - paused_at;
            if elapsed > Duration::zero() {
                self.paused_duration = self.paused_duration + elapsed;
            }
        }
        self.is_paused = false;
    }

    /// Moves the training to Done. Never clears `is_done`.
    ///
    /// A training that was never started gets `started_at` backfilled to
    /// `now - total_duration`, or `now` when no duration was recorded.
    pub fn finish(&mut self, now: DateTime<Utc>) {
        if self.is_paused {
            self.close_pause(now);
        }
        self.is_done = true;
        self.actual_date = Some(now);
        self.finished_at = Some(now);
        if self.started_at.is_none() {
            let backfill = self.total_duration.unwrap_or_else(Duration::zero);
            self.started_at = Some(now - backfill);
        }
    }

    pub fn complete(&mut self, now: DateTime<Utc>, rating: Option<i32>) {
        self.finish(now);
        self.rating = rating;
    }

    pub fn apply_timers(&mut self, patch: &TimerPatch) {
        if let Some(d) = patch.total_duration {
            self.total_duration = Some(d);
        }
        if let Some(d) = patch.total_rest_time {
            self.total_rest_time = Some(d);
        }
        if let Some(d) = patch.total_exercise_time {
            self.total_exercise_time = Some(d);
        }
    }

    pub fn apply_patch(
        &mut self,
        patch: &UpdateTraining,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if patch.is_done == Some(false) && self.is_done {
            return Err(TransitionError::Reopen);
        }

        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(planned_date) = patch.planned_date {
            self.planned_date = planned_date;
        }
        self.apply_timers(&TimerPatch {
            total_duration: patch.total_duration,
            total_rest_time: patch.total_rest_time,
            total_exercise_time: patch.total_exercise_time,
        });
        if let Some(rating) = patch.rating {
            self.rating = Some(rating);
        }
        if patch.is_done == Some(true) && !self.is_done {
            self.finish(now);
        }
        Ok(())
    }
}

/// Planned training fixture shared by unit tests across the crate.
#[cfg(test)]
pub(crate) fn planned_training() -> Training {
    Training {
        id: 1,
        user_id: Uuid::new_v4(),
        title: "Legs".to_string(),
        is_done: false,
        planned_date: chrono::TimeZone::with_ymd_and_hms(&Utc, 2023, 10, 5, 15, 0, 0).unwrap(),
        actual_date: None,
        started_at: None,
        finished_at: None,
        total_duration: None,
        total_rest_time: None,
        total_exercise_time: None,
        rating: None,
        is_paused: false,
        paused_at: None,
        paused_duration: Duration::zero(),
        exercises: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 5, h, m, 0).unwrap()
    }

    #[test]
    fn test_state_progression() {
        let mut training = planned_training();
        assert_eq!(training.state(), TrainingState::Planned);

        assert!(training.start(at(15, 0)));
        assert_eq!(training.state(), TrainingState::Started);

        training.pause(at(15, 10)).unwrap();
        assert_eq!(training.state(), TrainingState::Paused);

        training.resume(at(15, 15)).unwrap();
        assert_eq!(training.state(), TrainingState::Started);

        training.complete(at(16, 0), Some(4));
        assert_eq!(training.state(), TrainingState::Done);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut training = planned_training();
        training.start(at(15, 0));
        assert!(!training.start(at(15, 30)));
        assert_eq!(training.started_at, Some(at(15, 0)));
    }

    #[test]
    fn test_pause_requires_started_training() {
        let mut training = planned_training();
        assert_eq!(training.pause(at(15, 0)), Err(TransitionError::NotActive));
        assert_eq!(training.resume(at(15, 0)), Err(TransitionError::NotActive));
        assert!(!training.is_paused);
    }

    #[test]
    fn test_pause_resume_accumulates_paused_time() {
        let mut training = planned_training();
        training.start(at(15, 0));

        training.pause(at(15, 10)).unwrap();
        assert_eq!(training.pause(at(15, 12)), Ok(false));
        training.resume(at(15, 15)).unwrap();
        assert_eq!(training.resume(at(15, 16)), Ok(false));

        training.pause(at(15, 30)).unwrap();
        training.resume(at(15, 40)).unwrap();

        assert_eq!(training.paused_duration, Duration::minutes(15));
        assert_eq!(training.paused_at, None);
    }

    #[test]
    fn test_pause_after_completion_conflicts() {
        let mut training = planned_training();
        training.start(at(15, 0));
        training.complete(at(16, 0), None);
        assert_eq!(training.pause(at(16, 5)), Err(TransitionError::AlreadyCompleted));
    }

    #[test]
    fn test_finish_closes_open_pause() {
        let mut training = planned_training();
        training.start(at(15, 0));
        training.pause(at(15, 50)).unwrap();
        training.finish(at(16, 0));

        assert!(!training.is_paused);
        assert_eq!(training.paused_duration, Duration::minutes(10));
    }

    #[test]
    fn test_complete_backfills_start_from_total_duration() {
        let mut training = planned_training();
        training.total_duration = Some(Duration::minutes(45));
        training.complete(at(16, 0), Some(5));

        assert!(training.is_done);
        assert_eq!(training.started_at, Some(at(15, 15)));
        assert_eq!(training.finished_at, Some(at(16, 0)));
        assert_eq!(training.actual_date, Some(at(16, 0)));
        assert_eq!(training.rating, Some(5));
    }

    #[test]
    fn test_complete_without_duration_starts_now() {
        let mut training = planned_training();
        training.complete(at(16, 0), None);
        assert_eq!(training.started_at, Some(at(16, 0)));
    }

    #[test]
    fn test_complete_twice_keeps_done_and_moves_finish() {
        let mut training = planned_training();
        training.start(at(15, 0));
        training.complete(at(16, 0), Some(3));
        training.complete(at(17, 0), Some(4));

        assert!(training.is_done);
        assert_eq!(training.finished_at, Some(at(17, 0)));
        assert_eq!(training.actual_date, Some(at(17, 0)));
        assert_eq!(training.started_at, Some(at(15, 0)));
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let mut training = planned_training();
        training.total_rest_time = Some(Duration::minutes(3));
        training.rating = Some(2);
        let before = training.clone();

        training.apply_patch(&UpdateTraining::default(), at(18, 0)).unwrap();
        assert_eq!(training, before);
    }

    #[test]
    fn test_patch_overwrites_only_supplied_fields() {
        let mut training = planned_training();
        training.total_rest_time = Some(Duration::minutes(3));

        let patch = UpdateTraining {
            title: Some("Push".to_string()),
            total_duration: Some(Duration::minutes(50)),
            ..Default::default()
        };
        training.apply_patch(&patch, at(18, 0)).unwrap();

        assert_eq!(training.title, "Push");
        assert_eq!(training.total_duration, Some(Duration::minutes(50)));
        assert_eq!(training.total_rest_time, Some(Duration::minutes(3)));
        assert_eq!(training.planned_date, at(15, 0));
    }

    #[test]
    fn test_patch_cannot_reopen_done_training() {
        let mut training = planned_training();
        training.complete(at(16, 0), None);

        let patch = UpdateTraining {
            is_done: Some(false),
            ..Default::default()
        };
        assert_eq!(training.apply_patch(&patch, at(17, 0)), Err(TransitionError::Reopen));
        assert!(training.is_done);
    }

    #[test]
    fn test_patch_is_done_runs_completion() {
        let mut training = planned_training();
        training.rating = Some(4);
        let patch = UpdateTraining {
            is_done: Some(true),
            ..Default::default()
        };
        training.apply_patch(&patch, at(16, 0)).unwrap();

        assert!(training.is_done);
        assert_eq!(training.finished_at, Some(at(16, 0)));
        assert_eq!(training.rating, Some(4));
    }
}
