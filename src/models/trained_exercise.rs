use chrono::Duration;

/// One performed set of an exercise inside a training.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedExercise {
    pub id: i64,
    pub training_id: i64,
    pub exercise_id: i64,
    pub weight: Option<f64>,
    pub approaches: Option<i32>,
    pub reps: Option<i32>,
    pub time: Option<Duration>,
    pub doing: Option<Duration>,
    pub rest: Option<Duration>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrainedExercise {
    pub training_id: i64,
    pub exercise_id: i64,
    pub weight: Option<f64>,
    pub approaches: Option<i32>,
    pub reps: Option<i32>,
    pub time: Option<Duration>,
    pub doing: Option<Duration>,
    pub rest: Option<Duration>,
    pub notes: Option<String>,
}

impl NewTrainedExercise {
    /// An entry with every optional field absent, as seeded from a template.
    pub fn stub(training_id: i64, exercise_id: i64) -> Self {
        Self {
            training_id,
            exercise_id,
            weight: None,
            approaches: None,
            reps: None,
            time: None,
            doing: None,
            rest: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainedExercisePatch {
    pub weight: Option<f64>,
    pub approaches: Option<i32>,
    pub reps: Option<i32>,
    pub time: Option<Duration>,
    pub doing: Option<Duration>,
    pub rest: Option<Duration>,
    pub notes: Option<String>,
}

impl TrainedExercisePatch {
    pub fn rest(rest: Duration) -> Self {
        Self {
            rest: Some(rest),
            ..Default::default()
        }
    }

    pub fn doing(doing: Duration) -> Self {
        Self {
            doing: Some(doing),
            ..Default::default()
        }
    }
}

impl TrainedExercise {
    pub fn apply(&mut self, patch: &TrainedExercisePatch) {
        if let Some(weight) = patch.weight {
            self.weight = Some(weight);
        }
        if let Some(approaches) = patch.approaches {
            self.approaches = Some(approaches);
        }
        if let Some(reps) = patch.reps {
            self.reps = Some(reps);
        }
        if let Some(time) = patch.time {
            self.time = Some(time);
        }
        if let Some(doing) = patch.doing {
            self.doing = Some(doing);
        }
        if let Some(rest) = patch.rest {
            self.rest = Some(rest);
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
    }
}
