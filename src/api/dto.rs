//! Wire shapes of the HTTP API.
//!
//! Timestamps travel as RFC 3339 strings with second precision and a `Z`
//! suffix. Durations travel as compact unit-suffixed strings (`1h30m`).

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::duration::{format_duration, parse_duration};
use crate::models::{
    CreateTraining, NewTrainedExercise, TimerPatch, TrainedExercise, TrainedExercisePatch,
    Training, TrainingState, TrainingStats, UpdateTraining,
};

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_timestamp(value: &str, field: &str) -> ServiceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| ServiceError::invalid(format!("{field} must be an RFC 3339 timestamp")))
}

fn parse_optional_timestamp(value: Option<&str>, field: &str) -> ServiceResult<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(v, field)).transpose()
}

fn parse_field_duration(value: &str, field: &str) -> ServiceResult<Duration> {
    parse_duration(value).map_err(|err| ServiceError::invalid(format!("{field}: {err}")))
}

fn parse_optional_duration(value: Option<&str>, field: &str) -> ServiceResult<Option<Duration>> {
    value.map(|v| parse_field_duration(v, field)).transpose()
}

#[derive(Debug, Deserialize)]
pub struct CreateTrainingRequest {
    #[serde(default)]
    pub title: String,
    pub planned_date: Option<String>,
    pub total_duration: Option<String>,
    pub total_rest_time: Option<String>,
    pub total_exercise_time: Option<String>,
}

impl CreateTrainingRequest {
    pub fn into_command(self) -> ServiceResult<CreateTraining> {
        Ok(CreateTraining {
            title: self.title,
            planned_date: parse_optional_timestamp(self.planned_date.as_deref(), "planned_date")?,
            total_duration: parse_optional_duration(self.total_duration.as_deref(), "total_duration")?,
            total_rest_time: parse_optional_duration(self.total_rest_time.as_deref(), "total_rest_time")?,
            total_exercise_time: parse_optional_duration(
                self.total_exercise_time.as_deref(),
                "total_exercise_time",
            )?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTrainingRequest {
    pub title: Option<String>,
    pub planned_date: Option<String>,
    pub total_duration: Option<String>,
    pub total_rest_time: Option<String>,
    pub total_exercise_time: Option<String>,
    pub rating: Option<i32>,
    pub is_done: Option<bool>,
}

impl UpdateTrainingRequest {
    pub fn into_patch(self) -> ServiceResult<UpdateTraining> {
        Ok(UpdateTraining {
            title: self.title,
            planned_date: parse_optional_timestamp(self.planned_date.as_deref(), "planned_date")?,
            total_duration: parse_optional_duration(self.total_duration.as_deref(), "total_duration")?,
            total_rest_time: parse_optional_duration(self.total_rest_time.as_deref(), "total_rest_time")?,
            total_exercise_time: parse_optional_duration(
                self.total_exercise_time.as_deref(),
                "total_exercise_time",
            )?,
            rating: self.rating,
            is_done: self.is_done,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteTrainingRequest {
    pub rating: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTrainingTimersRequest {
    pub total_duration: Option<String>,
    pub total_rest_time: Option<String>,
    pub total_exercise_time: Option<String>,
}

impl UpdateTrainingTimersRequest {
    pub fn into_patch(self) -> ServiceResult<TimerPatch> {
        Ok(TimerPatch {
            total_duration: parse_optional_duration(self.total_duration.as_deref(), "total_duration")?,
            total_rest_time: parse_optional_duration(self.total_rest_time.as_deref(), "total_rest_time")?,
            total_exercise_time: parse_optional_duration(
                self.total_exercise_time.as_deref(),
                "total_exercise_time",
            )?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddExerciseRequest {
    pub training_id: i64,
    pub exercise_id: i64,
    pub weight: Option<f64>,
    pub approaches: Option<i32>,
    pub reps: Option<i32>,
    pub time: Option<String>,
    pub doing: Option<String>,
    pub rest: Option<String>,
    pub notes: Option<String>,
}

impl AddExerciseRequest {
    pub fn into_entry(self) -> ServiceResult<NewTrainedExercise> {
        Ok(NewTrainedExercise {
            training_id: self.training_id,
            exercise_id: self.exercise_id,
            weight: self.weight,
            approaches: self.approaches,
            reps: self.reps,
            time: parse_optional_duration(self.time.as_deref(), "time")?,
            doing: parse_optional_duration(self.doing.as_deref(), "doing")?,
            rest: parse_optional_duration(self.rest.as_deref(), "rest")?,
            notes: self.notes,
        })
    }
}

/// Body of both the full entry update and the mid-execution time update.
/// The latter ignores `notes`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTrainedExerciseRequest {
    pub weight: Option<f64>,
    pub approaches: Option<i32>,
    pub reps: Option<i32>,
    pub time: Option<String>,
    pub doing: Option<String>,
    pub rest: Option<String>,
    pub notes: Option<String>,
}

impl UpdateTrainedExerciseRequest {
    pub fn into_patch(self) -> ServiceResult<TrainedExercisePatch> {
        Ok(TrainedExercisePatch {
            weight: self.weight,
            approaches: self.approaches,
            reps: self.reps,
            time: parse_optional_duration(self.time.as_deref(), "time")?,
            doing: parse_optional_duration(self.doing.as_deref(), "doing")?,
            rest: parse_optional_duration(self.rest.as_deref(), "rest")?,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRestTimeRequest {
    pub rest_time: String,
}

impl UpdateRestTimeRequest {
    pub fn duration(&self) -> ServiceResult<Duration> {
        parse_field_duration(&self.rest_time, "rest_time")
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDoingTimeRequest {
    pub doing_time: String,
}

impl UpdateDoingTimeRequest {
    pub fn duration(&self) -> ServiceResult<Duration> {
        parse_field_duration(&self.doing_time, "doing_time")
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveExerciseQuery {
    pub training_id: i64,
    /// Id of the trained exercise entry, not of the catalog exercise.
    pub exercise_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GlobalTrainingsQuery {
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignGlobalTrainingRequest {
    pub planned_date: String,
}

#[derive(Debug, Serialize)]
pub struct TrainedExerciseResponse {
    pub id: i64,
    pub training_id: i64,
    pub exercise_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approaches: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<TrainedExercise> for TrainedExerciseResponse {
    fn from(entry: TrainedExercise) -> Self {
        Self {
            id: entry.id,
            training_id: entry.training_id,
            exercise_id: entry.exercise_id,
            weight: entry.weight,
            approaches: entry.approaches,
            reps: entry.reps,
            time: entry.time.map(format_duration),
            doing: entry.doing.map(format_duration),
            rest: entry.rest.map(format_duration),
            notes: entry.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrainingResponse {
    pub id: i64,
    pub title: String,
    pub user_id: Uuid,
    pub is_done: bool,
    pub state: TrainingState,
    pub planned_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rest_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_exercise_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    pub is_paused: bool,
    pub paused_duration: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<TrainedExerciseResponse>,
}

impl From<Training> for TrainingResponse {
    fn from(training: Training) -> Self {
        let state = training.state();
        Self {
            id: training.id,
            title: training.title,
            user_id: training.user_id,
            is_done: training.is_done,
            state,
            planned_date: format_timestamp(training.planned_date),
            actual_date: training.actual_date.map(format_timestamp),
            started_at: training.started_at.map(format_timestamp),
            finished_at: training.finished_at.map(format_timestamp),
            total_duration: training.total_duration.map(format_duration),
            total_rest_time: training.total_rest_time.map(format_duration),
            total_exercise_time: training.total_exercise_time.map(format_duration),
            rating: training.rating,
            is_paused: training.is_paused,
            paused_duration: format_duration(training.paused_duration),
            exercises: training
                .exercises
                .into_iter()
                .map(TrainedExerciseResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrainingStatsResponse {
    pub total_trainings: i64,
    pub completed_trainings: i64,
    pub average_rating: f64,
    pub total_duration: String,
}

impl From<TrainingStats> for TrainingStatsResponse {
    fn from(stats: TrainingStats) -> Self {
        Self {
            total_trainings: stats.total_trainings,
            completed_trainings: stats.completed_trainings,
            average_rating: stats.average_rating,
            total_duration: format_duration(stats.total_duration),
        }
    }
}
