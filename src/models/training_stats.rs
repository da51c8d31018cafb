use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{TrainedExercise, Training};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingStats {
    pub total_trainings: i64,
    pub completed_trainings: i64,
    pub average_rating: f64,
    pub total_duration: Duration,
}

/// Sums of the per-entry timers of one training, in whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingTime {
    pub total_seconds: i64,
    pub total_rest_seconds: i64,
    pub total_exercise_seconds: i64,
}

impl TrainingTime {
    pub fn from_exercises(exercises: &[TrainedExercise]) -> Self {
        let sum = |pick: fn(&TrainedExercise) -> Option<Duration>| {
            exercises
                .iter()
                .filter_map(pick)
                .fold(Duration::zero(), |acc, d| acc + d)
                .num_seconds()
        };

        Self {
            total_seconds: sum(|e| e.time),
            total_rest_seconds: sum(|e| e.rest),
            total_exercise_seconds: sum(|e| e.doing),
        }
    }
}

impl TrainingStats {
    /// Single-training view. A missing rating counts as 0.
    pub fn for_training(training: &Training) -> Self {
        Self {
            total_trainings: 1,
            completed_trainings: i64::from(training.is_done),
            average_rating: training.rating.map(f64::from).unwrap_or(0.0),
            total_duration: training.total_duration.unwrap_or_else(Duration::zero),
        }
    }

    /// Aggregate over all trainings of one user.
    ///
    /// The average divides the summed ratings of completed trainings by the
    /// number of completed trainings, rated or not. `total_duration` sums the
    /// recorded durations of completed trainings.
    pub fn for_user(trainings: &[Training]) -> Self {
        let mut completed = 0_i64;
        let mut rating_sum = 0_i64;
        let mut total_duration = Duration::zero();

        for training in trainings.iter().filter(|t| t.is_done) {
            completed += 1;
            if let Some(rating) = training.rating {
                rating_sum += i64::from(rating);
            }
            if let Some(d) = training.total_duration {
                total_duration = total_duration + d;
            }
        }

        let average_rating = if completed > 0 {
            rating_sum as f64 / completed as f64
        } else {
            0.0
        };

        Self {
            total_trainings: trainings.len() as i64,
            completed_trainings: completed,
            average_rating,
            total_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::planned_training;
    use pretty_assertions::assert_eq;

    fn entry(time: Option<i64>, doing: Option<i64>, rest: Option<i64>) -> TrainedExercise {
        TrainedExercise {
            id: 1,
            training_id: 1,
            exercise_id: 1,
            weight: None,
            approaches: None,
            reps: None,
            time: time.map(Duration::seconds),
            doing: doing.map(Duration::seconds),
            rest: rest.map(Duration::seconds),
            notes: None,
        }
    }

    #[test]
    fn test_training_time_for_no_entries_is_zero() {
        assert_eq!(TrainingTime::from_exercises(&[]), TrainingTime::default());
    }

    #[test]
    fn test_training_time_treats_absent_as_zero() {
        let exercises = vec![
            entry(Some(120), Some(80), Some(40)),
            entry(None, Some(30), None),
            entry(Some(60), None, Some(90)),
        ];
        let time = TrainingTime::from_exercises(&exercises);

        assert_eq!(time.total_seconds, 180);
        assert_eq!(time.total_exercise_seconds, 110);
        assert_eq!(time.total_rest_seconds, 130);
    }

    #[test]
    fn test_single_training_stats_without_rating() {
        let training = planned_training();
        let stats = TrainingStats::for_training(&training);

        assert_eq!(stats.total_trainings, 1);
        assert_eq!(stats.completed_trainings, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_duration, Duration::zero());
    }

    #[test]
    fn test_single_training_stats_when_done() {
        let mut training = planned_training();
        training.is_done = true;
        training.rating = Some(4);
        training.total_duration = Some(Duration::minutes(30));
        let stats = TrainingStats::for_training(&training);

        assert_eq!(stats.completed_trainings, 1);
        assert_eq!(stats.average_rating, 4.0);
        assert_eq!(stats.total_duration, Duration::minutes(30));
    }

    #[test]
    fn test_user_average_divides_by_completed_count() {
        let mut rated = planned_training();
        rated.is_done = true;
        rated.rating = Some(5);
        rated.total_duration = Some(Duration::minutes(40));

        let mut unrated = planned_training();
        unrated.is_done = true;
        unrated.total_duration = Some(Duration::minutes(20));

        let mut pending = planned_training();
        pending.rating = Some(1);
        pending.total_duration = Some(Duration::minutes(99));

        let stats = TrainingStats::for_user(&[rated, unrated, pending]);

        assert_eq!(stats.total_trainings, 3);
        assert_eq!(stats.completed_trainings, 2);
        assert_eq!(stats.average_rating, 2.5);
        assert_eq!(stats.total_duration, Duration::minutes(60));
    }

    #[test]
    fn test_user_stats_without_trainings() {
        let stats = TrainingStats::for_user(&[]);
        assert_eq!(stats.total_trainings, 0);
        assert_eq!(stats.average_rating, 0.0);
    }
}
