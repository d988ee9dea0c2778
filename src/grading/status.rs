use std::fmt;

use super::engine::{
    extreme_pair, grade_distribution, is_fully_evaluated, percentage_evaluated, weighted_average,
    BUCKET_COUNT, FULL_WEIGHT, MAX_GRADE,
};
use crate::store::types::GradeEntry;

/// Overall standing of a subject, derived from its weighted average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NoData,
    Excellent,
    VeryGood,
    Pass,
    NeedsImprovement,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::NoData => "No data",
            Status::Excellent => "Excellent",
            Status::VeryGood => "Very good",
            Status::Pass => "Pass",
            Status::NeedsImprovement => "Needs improvement",
        };
        f.write_str(label)
    }
}

pub fn performance_status(entries: &[GradeEntry]) -> Status {
    if entries.is_empty() {
        return Status::NoData;
    }
    let avg = weighted_average(entries);
    if avg >= 9.0 {
        Status::Excellent
    } else if avg >= 7.0 {
        Status::VeryGood
    } else if avg >= 5.0 {
        Status::Pass
    } else {
        Status::NeedsImprovement
    }
}

/// Percentage of the subject still waiting for a grade (never negative).
pub fn pending_percentage(entries: &[GradeEntry]) -> f64 {
    if is_fully_evaluated(entries) {
        return 0.0;
    }
    FULL_WEIGHT - percentage_evaluated(entries)
}

/// How far the current average is toward the maximum grade, in percent.
pub fn progress_to_max(entries: &[GradeEntry]) -> f64 {
    weighted_average(entries) * 100.0 / MAX_GRADE
}

/// Direction of performance relative to the extreme grades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    /// Average sits above the lowest grade recorded
    Improving { lowest: f64 },
    /// Average is pinned at the lowest grade, read against the highest
    Declining { highest: f64 },
}

/// Trend needs at least two grades to say anything.
pub fn trend(entries: &[GradeEntry]) -> Option<Trend> {
    if entries.len() < 2 {
        return None;
    }
    let (lowest, highest) = extreme_pair(entries);
    if weighted_average(entries) > lowest {
        Some(Trend::Improving { lowest })
    } else {
        Some(Trend::Declining { highest })
    }
}

/// Share of entries (0-100) in each distribution bucket.
pub fn distribution_shares(entries: &[GradeEntry]) -> [f64; BUCKET_COUNT] {
    let counts = grade_distribution(entries);
    let total = entries.len();
    let mut shares = [0.0; BUCKET_COUNT];
    if total == 0 {
        return shares;
    }
    for (share, count) in shares.iter_mut().zip(counts) {
        *share = count as f64 / total as f64 * 100.0;
    }
    shares
}

/// Everything the statistics view shows for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectStats {
    pub average: f64,
    pub evaluated: f64,
    pub pending: f64,
    pub lowest: f64,
    pub highest: f64,
    pub status: Status,
    pub progress: f64,
    pub distribution: [usize; BUCKET_COUNT],
    pub shares: [f64; BUCKET_COUNT],
    pub trend: Option<Trend>,
    /// Grade values in the order they were recorded
    pub series: Vec<f64>,
}

impl SubjectStats {
    pub fn from_entries(entries: &[GradeEntry]) -> Self {
        let (lowest, highest) = extreme_pair(entries);
        Self {
            average: weighted_average(entries),
            evaluated: percentage_evaluated(entries),
            pending: pending_percentage(entries),
            lowest,
            highest,
            status: performance_status(entries),
            progress: progress_to_max(entries),
            distribution: grade_distribution(entries),
            shares: distribution_shares(entries),
            trend: trend(entries),
            series: entries.iter().map(|e| e.value).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::engine::tests::entry;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(performance_status(&[]), Status::NoData);
        assert_eq!(performance_status(&[entry(9.0, 10.0)]), Status::Excellent);
        assert_eq!(performance_status(&[entry(7.0, 10.0)]), Status::VeryGood);
        assert_eq!(performance_status(&[entry(8.99, 10.0)]), Status::VeryGood);
        assert_eq!(performance_status(&[entry(5.0, 10.0)]), Status::Pass);
        assert_eq!(performance_status(&[entry(4.9, 10.0)]), Status::NeedsImprovement);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::NeedsImprovement.to_string(), "Needs improvement");
        assert_eq!(Status::NoData.to_string(), "No data");
    }

    #[test]
    fn test_pending_percentage() {
        assert_eq!(pending_percentage(&[]), 100.0);
        assert_eq!(pending_percentage(&[entry(5.0, 30.0)]), 70.0);
        assert_eq!(pending_percentage(&[entry(5.0, 60.0), entry(6.0, 60.0)]), 0.0);
        let rounded = vec![entry(5.0, 33.4), entry(6.0, 33.3), entry(7.0, 33.3)];
        assert_eq!(pending_percentage(&rounded), 0.0);
    }

    #[test]
    fn test_progress_to_max() {
        assert_eq!(progress_to_max(&[entry(6.5, 100.0)]), 65.0);
        assert_eq!(progress_to_max(&[]), 0.0);
    }

    #[test]
    fn test_trend_requires_two_grades() {
        assert_eq!(trend(&[]), None);
        assert_eq!(trend(&[entry(6.0, 20.0)]), None);
    }

    #[test]
    fn test_trend_improving() {
        let entries = vec![entry(4.0, 30.0), entry(8.0, 30.0)];
        assert_eq!(trend(&entries), Some(Trend::Improving { lowest: 4.0 }));
    }

    #[test]
    fn test_trend_declining_when_all_equal() {
        let entries = vec![entry(6.0, 30.0), entry(6.0, 30.0)];
        assert_eq!(trend(&entries), Some(Trend::Declining { highest: 6.0 }));
    }

    #[test]
    fn test_distribution_shares() {
        let entries = vec![entry(1.0, 10.0), entry(9.0, 10.0), entry(9.5, 10.0), entry(10.0, 10.0)];
        assert_eq!(distribution_shares(&entries), [25.0, 0.0, 0.0, 0.0, 75.0]);
        assert_eq!(distribution_shares(&[]), [0.0; BUCKET_COUNT]);
    }

    #[test]
    fn test_subject_stats_snapshot() {
        let entries = vec![entry(5.0, 30.0), entry(6.0, 30.0), entry(7.0, 40.0)];
        let stats = SubjectStats::from_entries(&entries);
        assert!((stats.average - 6.1).abs() < 1e-9);
        assert!((stats.evaluated - 100.0).abs() < 1e-9);
        assert_eq!(stats.pending, 0.0);
        assert_eq!((stats.lowest, stats.highest), (5.0, 7.0));
        assert_eq!(stats.status, Status::Pass);
        assert_eq!(stats.distribution, [0, 0, 1, 2, 0]);
        assert_eq!(stats.series, vec![5.0, 6.0, 7.0]);
        assert_eq!(stats.trend, Some(Trend::Improving { lowest: 5.0 }));
    }
}
