use super::engine::{
    is_fully_evaluated, percentage_evaluated, weighted_average, weighted_sum, FULL_WEIGHT,
    MAX_GRADE,
};
use crate::store::types::{GradeEntry, Objective};

/// Outcome of projecting the grade still needed to reach a target average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequiredGrade {
    /// Grade needed over the whole remaining weight. Zero means the target
    /// is already secured.
    Needed(f64),
    /// No weight left to grade; `satisfied` tells whether the final average
    /// already meets the target.
    FullyEvaluated { satisfied: bool },
    /// Even a perfect grade on the remaining weight falls short.
    Unreachable,
}

impl RequiredGrade {
    /// Whether the target can still be met (or already is).
    pub fn is_reachable(&self) -> bool {
        match self {
            RequiredGrade::Needed(_) => true,
            RequiredGrade::FullyEvaluated { satisfied } => *satisfied,
            RequiredGrade::Unreachable => false,
        }
    }
}

/// Grade needed on the ungraded remainder of the subject for the final
/// weighted average to reach `target`.
///
/// The remainder is treated as a single future entry carrying all of the
/// weight not yet evaluated. This inverts the weighted average:
/// `target = (weighted_sum + needed * remaining) / 100`.
pub fn required_future_grade(entries: &[GradeEntry], target: f64) -> RequiredGrade {
    if is_fully_evaluated(entries) {
        return RequiredGrade::FullyEvaluated {
            satisfied: weighted_average(entries) >= target,
        };
    }

    let remaining = FULL_WEIGHT - percentage_evaluated(entries);
    let needed = (target * FULL_WEIGHT - weighted_sum(entries)) / remaining;

    if needed > MAX_GRADE {
        RequiredGrade::Unreachable
    } else {
        RequiredGrade::Needed(needed.max(0.0))
    }
}

/// Whether the current average already meets an objective's target.
///
/// Advisory only: the stored `completed` flag is changed by the user and may
/// disagree with this.
pub fn objective_qualifies(objective: &Objective, current_average: f64) -> bool {
    current_average >= objective.target_grade
}
