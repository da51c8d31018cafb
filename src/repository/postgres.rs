use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{types::Json, FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult, TrainingRepository};
use crate::models::duration::{from_micros, to_micros};
use crate::models::{
    GlobalTraining, GlobalTrainingExercise, NewTrainedExercise, NewTraining, TimerPatch,
    TrainedExercise, TrainedExercisePatch, Training,
};

const TRAINING_COLUMNS: &str = "t.id, t.user_id, t.title, t.is_done, t.planned_date, \
     t.actual_date, t.started_at, t.finished_at, t.total_duration, t.total_rest_time, \
     t.total_exercise_time, t.rating, t.is_paused, t.paused_at, t.paused_duration";

const EXERCISE_COLUMNS: &str =
    "id, training_id, exercise_id, weight, approaches, reps, exercise_time, doing_time, rest_time, notes";

/// Nested exercises of the training aliased `t`, as one JSON array column.
fn exercises_aggregate_sql() -> String {
    format!(
        "COALESCE(
             (SELECT json_agg(te ORDER BY te.id)
              FROM (SELECT {EXERCISE_COLUMNS} FROM trained_exercises
                    WHERE training_id = t.id) te),
             '[]'::json) AS exercises"
    )
}

#[derive(Debug, FromRow)]
struct TrainingRow {
    id: i64,
    user_id: Uuid,
    title: String,
    is_done: bool,
    planned_date: DateTime<Utc>,
    actual_date: Option<DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    total_duration: Option<i64>,
    total_rest_time: Option<i64>,
    total_exercise_time: Option<i64>,
    rating: Option<i32>,
    is_paused: bool,
    paused_at: Option<DateTime<Utc>>,
    paused_duration: i64,
    #[sqlx(default)]
    exercises: Option<Json<Vec<TrainedExerciseRow>>>,
}

/// Shared by plain row reads and by the `json_agg` payload of a training.
#[derive(Debug, FromRow, Deserialize)]
struct TrainedExerciseRow {
    id: i64,
    training_id: i64,
    exercise_id: i64,
    weight: Option<f64>,
    approaches: Option<i32>,
    reps: Option<i32>,
    exercise_time: Option<i64>,
    doing_time: Option<i64>,
    rest_time: Option<i64>,
    notes: Option<String>,
}

#[derive(Debug, FromRow)]
struct GlobalTrainingRow {
    id: i64,
    title: String,
    description: Option<String>,
    level: String,
    exercises: Json<Vec<GlobalTrainingExercise>>,
}

impl From<TrainedExerciseRow> for TrainedExercise {
    fn from(row: TrainedExerciseRow) -> Self {
        Self {
            id: row.id,
            training_id: row.training_id,
            exercise_id: row.exercise_id,
            weight: row.weight,
            approaches: row.approaches,
            reps: row.reps,
            time: row.exercise_time.map(from_micros),
            doing: row.doing_time.map(from_micros),
            rest: row.rest_time.map(from_micros),
            notes: row.notes,
        }
    }
}

impl From<TrainingRow> for Training {
    fn from(row: TrainingRow) -> Self {
        let exercises = row
            .exercises
            .map(|Json(rows)| rows.into_iter().map(TrainedExercise::from).collect())
            .unwrap_or_default();

        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            is_done: row.is_done,
            planned_date: row.planned_date,
            actual_date: row.actual_date,
            started_at: row.started_at,
            finished_at: row.finished_at,
            total_duration: row.total_duration.map(from_micros),
            total_rest_time: row.total_rest_time.map(from_micros),
            total_exercise_time: row.total_exercise_time.map(from_micros),
            rating: row.rating,
            is_paused: row.is_paused,
            paused_at: row.paused_at,
            paused_duration: from_micros(row.paused_duration),
            exercises,
        }
    }
}

impl From<GlobalTrainingRow> for GlobalTraining {
    fn from(row: GlobalTrainingRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            level: row.level,
            exercises: row.exercises.0,
        }
    }
}

fn insert_training_sql() -> String {
    format!(
        "INSERT INTO trainings AS t (user_id, title, is_done, planned_date, actual_date, \
             total_duration, total_rest_time, total_exercise_time, created_at, updated_at)
         VALUES ($1, $2, FALSE, $3, $4, $5, $6, $7, $8, $8)
         RETURNING {TRAINING_COLUMNS}"
    )
}

fn global_training_sql(filter: &str) -> String {
    format!(
        "SELECT g.id, g.title, g.description, g.level,
                COALESCE(
                    (SELECT json_agg(json_build_object('exercise_id', ge.exercise_id, 'position', ge.position)
                                     ORDER BY ge.position)
                     FROM global_training_exercises ge WHERE ge.global_training_id = g.id),
                    '[]'::json) AS exercises
         FROM global_trainings g
         {filter}
         ORDER BY g.id"
    )
}

#[derive(Debug, Clone)]
pub struct PgTrainingRepository {
    db: PgPool,
}

impl PgTrainingRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TrainingRepository for PgTrainingRepository {
    async fn create_training(&self, training: NewTraining) -> RepositoryResult<Training> {
        let row = sqlx::query_as::<_, TrainingRow>(&insert_training_sql())
            .bind(training.user_id)
            .bind(&training.title)
            .bind(training.planned_date)
            .bind(training.actual_date)
            .bind(training.total_duration.map(to_micros))
            .bind(training.total_rest_time.map(to_micros))
            .bind(training.total_exercise_time.map(to_micros))
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        debug!(training_id = row.id, "training row inserted");
        Ok(row.into())
    }

    async fn get_training(&self, training_id: i64) -> RepositoryResult<Option<Training>> {
        let sql = format!(
            "SELECT {TRAINING_COLUMNS}, {}
             FROM trainings t
             WHERE t.id = $1",
            exercises_aggregate_sql()
        );

        let row = sqlx::query_as::<_, TrainingRow>(&sql)
            .bind(training_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Training::from))
    }

    async fn list_trainings_by_owner(&self, user_id: Uuid) -> RepositoryResult<Vec<Training>> {
        let sql = format!(
            "SELECT {TRAINING_COLUMNS} FROM trainings t
             WHERE t.user_id = $1
             ORDER BY t.planned_date DESC, t.id DESC"
        );

        let rows = sqlx::query_as::<_, TrainingRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        debug!(%user_id, trainings_count = rows.len(), "listed trainings");
        Ok(rows.into_iter().map(Training::from).collect())
    }

    async fn update_training(&self, training: &Training) -> RepositoryResult<Option<Training>> {
        let sql = format!(
            "UPDATE trainings AS t
             SET title = $2,
                 is_done = $3,
                 planned_date = $4,
                 actual_date = $5,
                 started_at = $6,
                 finished_at = $7,
                 total_duration = $8,
                 total_rest_time = $9,
                 total_exercise_time = $10,
                 rating = $11,
                 is_paused = $12,
                 paused_at = $13,
                 paused_duration = $14,
                 updated_at = $15
             WHERE t.id = $1 AND (NOT t.is_done OR $3)
             RETURNING {TRAINING_COLUMNS}"
        );

        let row = sqlx::query_as::<_, TrainingRow>(&sql)
            .bind(training.id)
            .bind(&training.title)
            .bind(training.is_done)
            .bind(training.planned_date)
            .bind(training.actual_date)
            .bind(training.started_at)
            .bind(training.finished_at)
            .bind(training.total_duration.map(to_micros))
            .bind(training.total_rest_time.map(to_micros))
            .bind(training.total_exercise_time.map(to_micros))
            .bind(training.rating)
            .bind(training.is_paused)
            .bind(training.paused_at)
            .bind(to_micros(training.paused_duration))
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await?;

        match row {
            Some(row) => {
                let mut updated = Training::from(row);
                updated.exercises = training.exercises.clone();
                Ok(Some(updated))
            }
            None => {
                // Either the row is gone or it was completed since it was read.
                debug!(training_id = training.id, "stale training write skipped");
                self.get_training(training.id).await
            }
        }
    }

    async fn update_training_timers(
        &self,
        training_id: i64,
        timers: &TimerPatch,
    ) -> RepositoryResult<Option<Training>> {
        let sql = format!(
            "WITH t AS (
                 UPDATE trainings
                 SET total_duration = COALESCE($2, total_duration),
                     total_rest_time = COALESCE($3, total_rest_time),
                     total_exercise_time = COALESCE($4, total_exercise_time),
                     updated_at = $5
                 WHERE id = $1
                 RETURNING *
             )
             SELECT {TRAINING_COLUMNS}, {}
             FROM t",
            exercises_aggregate_sql()
        );

        let row = sqlx::query_as::<_, TrainingRow>(&sql)
            .bind(training_id)
            .bind(timers.total_duration.map(to_micros))
            .bind(timers.total_rest_time.map(to_micros))
            .bind(timers.total_exercise_time.map(to_micros))
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Training::from))
    }

    async fn delete_training(&self, training_id: i64) -> RepositoryResult<bool> {
        let mut tx = self.db.begin().await?;

        let removed_entries = sqlx::query("DELETE FROM trained_exercises WHERE training_id = $1")
            .bind(training_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM trainings WHERE id = $1")
            .bind(training_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            training_id,
            removed_entries = removed_entries.rows_affected(),
            "training deleted"
        );
        Ok(result.rows_affected() > 0)
    }

    async fn add_exercise(&self, exercise: NewTrainedExercise) -> RepositoryResult<TrainedExercise> {
        let sql = format!(
            "INSERT INTO trained_exercises
                 (training_id, exercise_id, weight, approaches, reps, exercise_time, doing_time, rest_time, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {EXERCISE_COLUMNS}"
        );

        let row = sqlx::query_as::<_, TrainedExerciseRow>(&sql)
            .bind(exercise.training_id)
            .bind(exercise.exercise_id)
            .bind(exercise.weight)
            .bind(exercise.approaches)
            .bind(exercise.reps)
            .bind(exercise.time.map(to_micros))
            .bind(exercise.doing.map(to_micros))
            .bind(exercise.rest.map(to_micros))
            .bind(&exercise.notes)
            .fetch_one(&self.db)
            .await?;

        Ok(row.into())
    }

    async fn update_exercise(
        &self,
        entry_id: i64,
        patch: &TrainedExercisePatch,
    ) -> RepositoryResult<Option<TrainedExercise>> {
        let sql = format!(
            "UPDATE trained_exercises
             SET weight = COALESCE($2, weight),
                 approaches = COALESCE($3, approaches),
                 reps = COALESCE($4, reps),
                 exercise_time = COALESCE($5, exercise_time),
                 doing_time = COALESCE($6, doing_time),
                 rest_time = COALESCE($7, rest_time),
                 notes = COALESCE($8, notes)
             WHERE id = $1
             RETURNING {EXERCISE_COLUMNS}"
        );

        let row = sqlx::query_as::<_, TrainedExerciseRow>(&sql)
            .bind(entry_id)
            .bind(patch.weight)
            .bind(patch.approaches)
            .bind(patch.reps)
            .bind(patch.time.map(to_micros))
            .bind(patch.doing.map(to_micros))
            .bind(patch.rest.map(to_micros))
            .bind(&patch.notes)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(TrainedExercise::from))
    }

    async fn delete_exercise(&self, training_id: i64, entry_id: i64) -> RepositoryResult<bool> {
        let result =
            sqlx::query("DELETE FROM trained_exercises WHERE id = $1 AND training_id = $2")
                .bind(entry_id)
                .bind(training_id)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_global_trainings(
        &self,
        level: Option<String>,
    ) -> RepositoryResult<Vec<GlobalTraining>> {
        let rows = match level {
            Some(level) => {
                sqlx::query_as::<_, GlobalTrainingRow>(&global_training_sql("WHERE g.level = $1"))
                    .bind(level)
                    .fetch_all(&self.db)
                    .await?
            }
            None => {
                sqlx::query_as::<_, GlobalTrainingRow>(&global_training_sql(""))
                    .fetch_all(&self.db)
                    .await?
            }
        };

        Ok(rows.into_iter().map(GlobalTraining::from).collect())
    }

    async fn get_global_training(&self, id: i64) -> RepositoryResult<Option<GlobalTraining>> {
        let row = sqlx::query_as::<_, GlobalTrainingRow>(&global_training_sql("WHERE g.id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(GlobalTraining::from))
    }

    async fn create_training_with_exercises(
        &self,
        training: NewTraining,
        exercise_ids: Vec<i64>,
    ) -> RepositoryResult<Training> {
        // Dropping `tx` on any early return rolls the whole assignment back.
        let mut tx = self.db.begin().await?;

        let created = sqlx::query_as::<_, TrainingRow>(&insert_training_sql())
            .bind(training.user_id)
            .bind(&training.title)
            .bind(training.planned_date)
            .bind(training.actual_date)
            .bind(training.total_duration.map(to_micros))
            .bind(training.total_rest_time.map(to_micros))
            .bind(training.total_exercise_time.map(to_micros))
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        for exercise_id in &exercise_ids {
            sqlx::query("INSERT INTO trained_exercises (training_id, exercise_id) VALUES ($1, $2)")
                .bind(created.id)
                .bind(exercise_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(
            training_id = created.id,
            exercises_count = exercise_ids.len(),
            "training created with exercises"
        );

        self.get_training(created.id).await?.ok_or_else(|| {
            RepositoryError::Decode(format!("training {} vanished after commit", created.id))
        })
    }
}
