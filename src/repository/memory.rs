use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult, TrainingRepository};
use crate::models::{
    GlobalTraining, NewTrainedExercise, NewTraining, TimerPatch, TrainedExercise,
    TrainedExercisePatch, Training,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    trainings: BTreeMap<i64, Training>,
    exercises: BTreeMap<i64, TrainedExercise>,
    global_trainings: BTreeMap<i64, GlobalTraining>,
    last_training_id: i64,
    last_exercise_id: i64,
    failing_exercise_ids: HashSet<i64>,
}

impl MemoryState {
    fn insert_training(&mut self, training: NewTraining) -> Training {
        self.last_training_id += 1;
        let created = Training {
            id: self.last_training_id,
            user_id: training.user_id,
            title: training.title,
            is_done: false,
            planned_date: training.planned_date,
            actual_date: training.actual_date,
            started_at: None,
            finished_at: None,
            total_duration: training.total_duration,
            total_rest_time: training.total_rest_time,
            total_exercise_time: training.total_exercise_time,
            rating: None,
            is_paused: false,
            paused_at: None,
            paused_duration: Duration::zero(),
            exercises: Vec::new(),
        };
        self.trainings.insert(created.id, created.clone());
        created
    }

    fn insert_exercise(&mut self, exercise: NewTrainedExercise) -> RepositoryResult<TrainedExercise> {
        if self.failing_exercise_ids.contains(&exercise.exercise_id) {
            return Err(RepositoryError::Unavailable(format!(
                "insert rejected for exercise {}",
                exercise.exercise_id
            )));
        }
        if !self.trainings.contains_key(&exercise.training_id) {
            return Err(RepositoryError::Unavailable(format!(
                "foreign key violation: training {} does not exist",
                exercise.training_id
            )));
        }

        self.last_exercise_id += 1;
        let created = TrainedExercise {
            id: self.last_exercise_id,
            training_id: exercise.training_id,
            exercise_id: exercise.exercise_id,
            weight: exercise.weight,
            approaches: exercise.approaches,
            reps: exercise.reps,
            time: exercise.time,
            doing: exercise.doing,
            rest: exercise.rest,
            notes: exercise.notes,
        };
        self.exercises.insert(created.id, created.clone());
        Ok(created)
    }

    fn hydrate(&self, training: &Training) -> Training {
        let mut hydrated = training.clone();
        hydrated.exercises = self
            .exercises
            .values()
            .filter(|e| e.training_id == training.id)
            .cloned()
            .collect();
        hydrated
    }
}

/// Process-local store used by tests and by runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryTrainingRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryTrainingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global_training(mut self, template: GlobalTraining) -> Self {
        self.state
            .get_mut()
            .global_trainings
            .insert(template.id, template);
        self
    }

    /// Makes every insert of an entry referencing `exercise_id` fail.
    pub fn fail_inserts_for_exercise(mut self, exercise_id: i64) -> Self {
        self.state.get_mut().failing_exercise_ids.insert(exercise_id);
        self
    }

    pub async fn training_count(&self) -> usize {
        self.state.read().await.trainings.len()
    }

    pub async fn exercise_count(&self) -> usize {
        self.state.read().await.exercises.len()
    }
}

#[async_trait]
impl TrainingRepository for InMemoryTrainingRepository {
    async fn create_training(&self, training: NewTraining) -> RepositoryResult<Training> {
        let mut state = self.state.write().await;
        let created = state.insert_training(training);
        debug!(training_id = created.id, "training stored in memory");
        Ok(created)
    }

    async fn get_training(&self, training_id: i64) -> RepositoryResult<Option<Training>> {
        let state = self.state.read().await;
        Ok(state
            .trainings
            .get(&training_id)
            .map(|training| state.hydrate(training)))
    }

    async fn list_trainings_by_owner(&self, user_id: Uuid) -> RepositoryResult<Vec<Training>> {
        let state = self.state.read().await;
        let mut trainings: Vec<Training> = state
            .trainings
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        trainings.sort_by(|a, b| {
            b.planned_date
                .cmp(&a.planned_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(trainings)
    }

    async fn update_training(&self, training: &Training) -> RepositoryResult<Option<Training>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.trainings.get_mut(&training.id) else {
            return Ok(None);
        };

        if stored.is_done && !training.is_done {
            debug!(training_id = training.id, "stale training write skipped");
        } else {
            // Entries live in their own map; the stored root never carries them.
            *stored = Training {
                exercises: Vec::new(),
                ..training.clone()
            };
        }

        let stored = stored.clone();
        Ok(Some(state.hydrate(&stored)))
    }

    async fn update_training_timers(
        &self,
        training_id: i64,
        timers: &TimerPatch,
    ) -> RepositoryResult<Option<Training>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.trainings.get_mut(&training_id) else {
            return Ok(None);
        };
        stored.apply_timers(timers);

        let stored = stored.clone();
        Ok(Some(state.hydrate(&stored)))
    }

    async fn delete_training(&self, training_id: i64) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        if state.trainings.remove(&training_id).is_none() {
            return Ok(false);
        }
        state.exercises.retain(|_, e| e.training_id != training_id);
        Ok(true)
    }

    async fn add_exercise(&self, exercise: NewTrainedExercise) -> RepositoryResult<TrainedExercise> {
        let mut state = self.state.write().await;
        state.insert_exercise(exercise)
    }

    async fn update_exercise(
        &self,
        entry_id: i64,
        patch: &TrainedExercisePatch,
    ) -> RepositoryResult<Option<TrainedExercise>> {
        let mut state = self.state.write().await;
        Ok(state.exercises.get_mut(&entry_id).map(|stored| {
            stored.apply(patch);
            stored.clone()
        }))
    }

    async fn delete_exercise(&self, training_id: i64, entry_id: i64) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        let matches = state
            .exercises
            .get(&entry_id)
            .is_some_and(|e| e.training_id == training_id);
        if matches {
            state.exercises.remove(&entry_id);
        }
        Ok(matches)
    }

    async fn list_global_trainings(
        &self,
        level: Option<String>,
    ) -> RepositoryResult<Vec<GlobalTraining>> {
        let state = self.state.read().await;
        Ok(state
            .global_trainings
            .values()
            .filter(|g| level.as_deref().map_or(true, |level| g.level == level))
            .cloned()
            .collect())
    }

    async fn get_global_training(&self, id: i64) -> RepositoryResult<Option<GlobalTraining>> {
        Ok(self.state.read().await.global_trainings.get(&id).cloned())
    }

    async fn create_training_with_exercises(
        &self,
        training: NewTraining,
        exercise_ids: Vec<i64>,
    ) -> RepositoryResult<Training> {
        let mut state = self.state.write().await;

        // Work on a copy and swap it in only once every insert succeeded.
        let mut staged = state.clone();
        let created = staged.insert_training(training);
        for exercise_id in exercise_ids {
            staged.insert_exercise(NewTrainedExercise::stub(created.id, exercise_id))?;
        }

        *state = staged;
        Ok(state.hydrate(&created))
    }
}
