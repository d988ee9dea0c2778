use crate::store::types::GradeEntry;

/// Highest grade a single entry can score
pub const MAX_GRADE: f64 = 10.0;

/// Weight total (in percent) that marks a subject as fully evaluated
pub const FULL_WEIGHT: f64 = 100.0;

/// Float slack when comparing a weight total against [`FULL_WEIGHT`]
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Number of histogram buckets in [`grade_distribution`]
pub const BUCKET_COUNT: usize = 5;

/// Labels matching the buckets of [`grade_distribution`], in order
pub const BUCKET_LABELS: [&str; BUCKET_COUNT] = ["0-2", "2-4", "4-6", "6-8", "8-10"];

/// Sum of `value * weight` across all entries.
pub fn weighted_sum(entries: &[GradeEntry]) -> f64 {
    entries.iter().map(|e| e.value * e.weight).sum()
}

/// Weighted average of the entries' values.
///
/// Returns 0 for an empty list, and also when every weight is zero so that
/// malformed input never produces NaN.
pub fn weighted_average(entries: &[GradeEntry]) -> f64 {
    let total_weight = percentage_evaluated(entries);
    if entries.is_empty() || total_weight == 0.0 {
        return 0.0;
    }
    weighted_sum(entries) / total_weight
}

/// Raw sum of weights, read as the percentage of the subject already graded.
pub fn percentage_evaluated(entries: &[GradeEntry]) -> f64 {
    entries.iter().map(|e| e.weight).sum()
}

/// Whether the weights cover the whole subject, ignoring float rounding
/// (33.4 + 33.3 + 33.3 adds up to 99.99999999999999).
pub fn is_fully_evaluated(entries: &[GradeEntry]) -> bool {
    percentage_evaluated(entries) >= FULL_WEIGHT - WEIGHT_EPSILON
}

/// Lowest and highest grade values, `(0, 0)` when there are no entries.
pub fn extreme_pair(entries: &[GradeEntry]) -> (f64, f64) {
    let mut values = entries.iter().map(|e| e.value);
    let Some(first) = values.next() else {
        return (0.0, 0.0);
    };
    values.fold((first, first), |(min, max), v| (min.min(v), max.max(v)))
}

/// Histogram of grade values over `[0,2) [2,4) [4,6) [6,8) [8,10]`.
pub fn grade_distribution(entries: &[GradeEntry]) -> [usize; BUCKET_COUNT] {
    let mut buckets = [0; BUCKET_COUNT];
    for entry in entries {
        buckets[bucket_index(entry.value)] += 1;
    }
    buckets
}

/// Bucket for a single value. The top bucket is closed so 10 lands in it;
/// out-of-range values are pinned to the edge buckets.
fn bucket_index(value: f64) -> usize {
    if value.is_nan() || value < 2.0 {
        0
    } else if value < 4.0 {
        1
    } else if value < 6.0 {
        2
    } else if value < 8.0 {
        3
    } else {
        4
    }
}
