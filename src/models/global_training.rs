use serde::{Deserialize, Serialize};

/// Read-only workout template shared by all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalTraining {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub level: String,
    pub exercises: Vec<GlobalTrainingExercise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTrainingExercise {
    pub exercise_id: i64,
    pub position: i32,
}

impl GlobalTraining {
    pub fn exercise_ids(&self) -> Vec<i64> {
        let mut ordered = self.exercises.clone();
        ordered.sort_by_key(|e| e.position);
        ordered.into_iter().map(|e| e.exercise_id).collect()
    }
}
