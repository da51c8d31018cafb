use chrono::Duration;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Training id validation
pub fn validate_training_id(id: i64) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::invalid("invalid training id"));
    }
    Ok(())
}

/// Trained exercise entry id validation
pub fn validate_entry_id(id: i64) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::invalid("invalid trained exercise id"));
    }
    Ok(())
}

/// Catalog exercise id validation
pub fn validate_exercise_id(id: i64) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::invalid("invalid exercise id"));
    }
    Ok(())
}

pub fn validate_global_training_id(id: i64) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::invalid("invalid global training id"));
    }
    Ok(())
}

pub fn validate_user_id(user_id: Uuid) -> ServiceResult<()> {
    if user_id.is_nil() {
        return Err(ServiceError::invalid("invalid user id"));
    }
    Ok(())
}

/// Rating must be between 1 and 5
pub fn validate_rating(rating: Option<i32>) -> ServiceResult<()> {
    match rating {
        Some(r) if !(1..=5).contains(&r) => {
            Err(ServiceError::invalid("rating must be between 1 and 5"))
        }
        _ => Ok(()),
    }
}

pub fn validate_non_negative(d: Option<Duration>, field_name: &str) -> ServiceResult<()> {
    match d {
        Some(d) if d < Duration::zero() => Err(ServiceError::invalid(format!(
            "{} cannot be negative",
            field_name
        ))),
        _ => Ok(()),
    }
}

/// Weight in kilograms
pub fn validate_weight(weight: Option<f64>) -> ServiceResult<()> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => {
            Err(ServiceError::invalid("weight must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

pub fn validate_count(value: Option<i32>, field_name: &str) -> ServiceResult<()> {
    match value {
        Some(v) if v < 0 => Err(ServiceError::invalid(format!(
            "{} cannot be negative",
            field_name
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_id_validation() {
        assert!(validate_training_id(1).is_ok());
        assert_matches!(validate_training_id(0), Err(ServiceError::InvalidArgument(_)));
        assert_matches!(validate_entry_id(-3), Err(ServiceError::InvalidArgument(_)));
        assert_matches!(validate_exercise_id(0), Err(ServiceError::InvalidArgument(_)));
        assert_matches!(validate_global_training_id(0), Err(ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn test_user_id_validation() {
        assert!(validate_user_id(Uuid::new_v4()).is_ok());
        assert_matches!(validate_user_id(Uuid::nil()), Err(ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn test_rating_validation() {
        assert!(validate_rating(None).is_ok());
        assert!(validate_rating(Some(1)).is_ok());
        assert!(validate_rating(Some(5)).is_ok());
        assert!(validate_rating(Some(0)).is_err());
        assert!(validate_rating(Some(6)).is_err());
    }

    #[test]
    fn test_measurement_validation() {
        assert!(validate_weight(Some(52.5)).is_ok());
        assert!(validate_weight(Some(-1.0)).is_err());
        assert!(validate_weight(Some(f64::NAN)).is_err());
        assert!(validate_count(Some(0), "reps").is_ok());
        assert!(validate_count(Some(-2), "reps").is_err());
        assert!(validate_non_negative(Some(Duration::seconds(-1)), "rest").is_err());
    }
}
