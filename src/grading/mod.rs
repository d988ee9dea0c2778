pub mod engine;
pub mod projection;
pub mod status;
pub mod validation;

pub use engine::{
    extreme_pair, grade_distribution, is_fully_evaluated, percentage_evaluated, weighted_average,
    BUCKET_LABELS, FULL_WEIGHT, MAX_GRADE,
};
pub use projection::{objective_qualifies, required_future_grade, RequiredGrade};
pub use status::{performance_status, trend, Status, SubjectStats, Trend};
pub use validation::{validate_grade, validate_objective, validate_subject_name, validate_weight_set};
