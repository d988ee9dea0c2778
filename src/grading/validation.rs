use super::engine::{FULL_WEIGHT, MAX_GRADE};

/// Slack allowed when a weight set must add up to 100%
pub const WEIGHT_SUM_TOLERANCE: f64 = 1.0;

fn check_grade_value(field: &str, value: f64, errors: &mut Vec<String>) {
    if !value.is_finite() || !(0.0..=MAX_GRADE).contains(&value) {
        errors.push(format!("{}: must be between 0 and {}, got {}", field, MAX_GRADE, value));
    }
}

fn check_weight(field: &str, weight: f64, errors: &mut Vec<String>) {
    if !weight.is_finite() || weight <= 0.0 || weight > FULL_WEIGHT {
        errors.push(format!(
            "{}: must be greater than 0 and at most {}, got {}",
            field, FULL_WEIGHT, weight
        ));
    }
}

/// Validate a grade entry before it is stored.
/// Returns all validation errors at once (not just the first).
pub fn validate_grade(name: &str, value: f64, weight: f64) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push("grade.name: must not be empty".to_string());
    }
    check_grade_value("grade.value", value, &mut errors);
    check_weight("grade.weight", weight, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_objective(description: &str, target_grade: f64) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if description.trim().is_empty() {
        errors.push("objective.description: must not be empty".to_string());
    }
    check_grade_value("objective.target", target_grade, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_subject_name(name: &str) -> Result<(), Vec<String>> {
    if name.trim().is_empty() {
        Err(vec!["subject.name: must not be empty".to_string()])
    } else {
        Ok(())
    }
}

/// Validate a complete set of grades and weights entered in one go.
///
/// Each position pairs a grade with its weight; the weights must cover the
/// whole subject (100%, within [`WEIGHT_SUM_TOLERANCE`]).
pub fn validate_weight_set(grades: &[f64], weights: &[f64]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if grades.is_empty() || weights.is_empty() {
        errors.push("at least one grade and one weight are required".to_string());
    }
    if grades.len() != weights.len() {
        errors.push(format!(
            "got {} grades but {} weights; each grade needs exactly one weight",
            grades.len(),
            weights.len()
        ));
    }

    for (i, value) in grades.iter().enumerate() {
        check_grade_value(&format!("grades[{}]", i), *value, &mut errors);
    }
    for (i, weight) in weights.iter().enumerate() {
        check_weight(&format!("weights[{}]", i), *weight, &mut errors);
    }

    if !weights.is_empty() {
        let sum: f64 = weights.iter().sum();
        if (sum - FULL_WEIGHT).abs() > WEIGHT_SUM_TOLERANCE {
            errors.push(format!("weights: must add up to {}, got {}", FULL_WEIGHT, sum));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
