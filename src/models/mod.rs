// Domain models for trainings and their performed exercises

pub mod duration;
pub mod global_training;
pub mod trained_exercise;
pub mod training;
pub mod training_stats;
pub mod validation;

pub use global_training::*;
pub use trained_exercise::*;
pub use training::*;
pub use training_stats::*;
