//! Request-shape checks. Relational integrity is left to Postgres.

use crate::errors::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Same as `require_non_empty`, but only when the field is being set.
pub fn non_empty_if_present(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) => require_non_empty(field, v),
        None => Ok(()),
    }
}

pub fn non_negative(field: &str, value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::Validation(format!(
            "{field} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

pub fn rating_in_range(value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if !(0.0..=5.0).contains(&v) => Err(AppError::Validation(
            "rating must be between 0 and 5".to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn budget_bounds(min: Option<f64>, max: Option<f64>) -> Result<(), AppError> {
    non_negative("budget_min", min)?;
    non_negative("budget_max", max)?;
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(AppError::Validation(
                "budget_min cannot exceed budget_max".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty_rejects_whitespace() {
        assert!(require_non_empty("title", "   ").is_err());
        assert!(require_non_empty("title", "Logo design").is_ok());
    }

    #[test]
    fn test_non_empty_if_present_skips_absent_fields() {
        assert!(non_empty_if_present("name", None).is_ok());
        assert!(non_empty_if_present("name", Some("")).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("hourly_rate", Some(-1.0)).is_err());
        assert!(non_negative("hourly_rate", Some(f64::NAN)).is_err());
        assert!(non_negative("hourly_rate", Some(0.0)).is_ok());
        assert!(non_negative("hourly_rate", None).is_ok());
    }

    #[test]
    fn test_rating_in_range() {
        assert!(rating_in_range(Some(5.0)).is_ok());
        assert!(rating_in_range(Some(5.5)).is_err());
        assert!(rating_in_range(Some(-0.1)).is_err());
        assert!(rating_in_range(None).is_ok());
    }

    #[test]
    fn test_budget_bounds_ordering() {
        assert!(budget_bounds(Some(100.0), Some(50.0)).is_err());
        assert!(budget_bounds(Some(50.0), Some(50.0)).is_ok());
        assert!(budget_bounds(None, Some(50.0)).is_ok());
        assert!(budget_bounds(Some(-5.0), None).is_err());
    }
}
