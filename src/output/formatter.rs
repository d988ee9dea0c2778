use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::grading::status::pending_percentage;
use crate::grading::{
    objective_qualifies, percentage_evaluated, performance_status, required_future_grade,
    weighted_average, RequiredGrade, Status, SubjectStats, Trend, BUCKET_LABELS,
};
use crate::store::types::{GradeEntry, Objective, ObjectiveState, Subject};

/// Width of the distribution bars in the stats view
const BAR_WIDTH: usize = 20;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Grades are shown with two decimals, e.g. "6.10"
pub fn format_grade(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

pub fn greeting(username: Option<&str>) -> String {
    format!("Welcome, {}!", username.filter(|u| !u.is_empty()).unwrap_or("User"))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn paint_status(status: Status, use_colors: bool) -> String {
    let label = status.to_string();
    if !use_colors {
        return label;
    }
    match status {
        Status::NoData => label.dimmed().to_string(),
        Status::Excellent => label.green().to_string(),
        Status::VeryGood => label.blue().to_string(),
        Status::Pass => label.yellow().to_string(),
        Status::NeedsImprovement => label.red().to_string(),
    }
}

/// Format subjects as a table with columns: Index, Average, Evaluated, Name, Status
/// Index column: 3 chars (fits "99."), right-aligned
pub fn format_subject_table(subjects: &[Subject], use_colors: bool) -> String {
    if subjects.is_empty() {
        return "No subjects yet.".to_string();
    }

    let term_width = get_terminal_width();
    let separator = "  ";
    // index (3) + space + average (5) + evaluated (4)
    let fixed_width = 3 + 1 + 5 + separator.len() * 3 + 4;

    subjects
        .iter()
        .enumerate()
        .map(|(idx, subject)| {
            let index_str = format!("{:>2}.", idx + 1);
            let average = format!("{:>5}", format_grade(weighted_average(&subject.grades)));
            let evaluated = format!("{:>4}", format_percent(percentage_evaluated(&subject.grades)));
            let status = performance_status(&subject.grades);

            let name = match term_width {
                Some(width) if width > fixed_width + 30 => {
                    truncate_name(&subject.name, width - fixed_width - 20)
                }
                Some(_) => truncate_name(&subject.name, 20),
                None => subject.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    average.bold(),
                    separator,
                    evaluated,
                    separator,
                    name,
                    separator,
                    paint_status(status, true)
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, average, separator, evaluated, separator, name, separator, status
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format subjects as tab-separated values for scripting
/// Columns: name, average, evaluated, grade count (no headers, no colors)
pub fn format_tsv(subjects: &[Subject]) -> String {
    subjects
        .iter()
        .map(|subject| {
            format!(
                "{}\t{}\t{:.0}\t{}",
                subject.name,
                format_grade(weighted_average(&subject.grades)),
                percentage_evaluated(&subject.grades),
                subject.grades.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_grade_line(idx: usize, grade: &GradeEntry, use_colors: bool) -> String {
    if use_colors {
        format!(
            "  {:>2}. {:>5}  {:>4}  {}",
            idx + 1,
            format_grade(grade.value).bold(),
            format_percent(grade.weight),
            grade.name
        )
    } else {
        format!(
            "  {:>2}. {:>5}  {:>4}  {}",
            idx + 1,
            format_grade(grade.value),
            format_percent(grade.weight),
            grade.name
        )
    }
}

/// Multi-line view of a subject and its grades
pub fn format_subject_detail(subject: &Subject, use_colors: bool) -> String {
    let mut lines = Vec::new();
    if use_colors {
        lines.push(subject.name.bold().to_string());
    } else {
        lines.push(subject.name.clone());
    }
    if !subject.professor.is_empty() {
        lines.push(format!("  Professor: {}", subject.professor));
    }
    lines.push(format!("  Credits: {}", subject.credits));
    lines.push(format!(
        "  Weighted average: {}",
        format_grade(weighted_average(&subject.grades))
    ));
    lines.push(format!(
        "  Evaluated: {}",
        format_percent(percentage_evaluated(&subject.grades))
    ));
    lines.push(format!("  ID: {}", subject.id));

    if subject.grades.is_empty() {
        lines.push("  No grades recorded.".to_string());
    } else {
        lines.push("  Grades:".to_string());
        for (idx, grade) in subject.grades.iter().enumerate() {
            lines.push(format_grade_line(idx, grade, use_colors));
        }
    }
    lines.join("\n")
}

fn bar(share: f64) -> String {
    let filled = ((share / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Statistics view: summary, distribution and trend
pub fn format_stats(subject: &Subject, stats: &SubjectStats, use_colors: bool) -> String {
    let mut lines = Vec::new();
    let title = format!("Statistics for {}", subject.name);
    if use_colors {
        lines.push(title.bold().to_string());
    } else {
        lines.push(title);
    }

    lines.push(format!("  Status: {}", paint_status(stats.status, use_colors)));
    lines.push(format!("  Weighted average: {}", format_grade(stats.average)));
    lines.push(format!(
        "  Progress toward 10: {}",
        format_percent(stats.progress)
    ));
    lines.push(format!("  Evaluated: {}", format_percent(stats.evaluated)));
    if stats.pending > 0.0 {
        lines.push(format!("  Still to evaluate: {}", format_percent(stats.pending)));
    } else {
        lines.push("  Evaluation complete".to_string());
    }
    lines.push(format!(
        "  Lowest / highest: {} / {}",
        format_grade(stats.lowest),
        format_grade(stats.highest)
    ));

    lines.push(String::new());
    lines.push("  Distribution:".to_string());
    for ((label, count), share) in BUCKET_LABELS.iter().zip(stats.distribution).zip(stats.shares) {
        lines.push(format!("  {:>5}  {}  {}", label, bar(share), count));
    }
    let total = stats.series.len();
    if total == 0 {
        lines.push("  Not enough data to show a distribution".to_string());
    } else {
        lines.push(format!("  Based on {} recorded grades", total));
    }

    lines.push(String::new());
    match stats.trend {
        None => lines.push("  Trend: at least 2 grades are needed".to_string()),
        Some(trend) => {
            let series = stats
                .series
                .iter()
                .map(|v| format_grade(*v))
                .collect::<Vec<_>>()
                .join(" -> ");
            lines.push(format!("  Trend: {}", series));
            lines.push(format!("  {}", format_trend(trend)));
        }
    }

    lines.join("\n")
}

pub fn format_trend(trend: Trend) -> String {
    match trend {
        Trend::Improving { lowest } => format!(
            "Performance has improved since the lowest grade ({})",
            format_grade(lowest)
        ),
        Trend::Declining { highest } => format!(
            "Performance has dropped since the highest grade ({})",
            format_grade(highest)
        ),
    }
}

/// Human-readable projection for one target
pub fn format_required_grade(required: RequiredGrade, pending: f64) -> String {
    match required {
        RequiredGrade::Needed(n) if n == 0.0 => "Target already secured".to_string(),
        RequiredGrade::Needed(n) => format!(
            "You need at least {} on the remaining {}",
            format_grade(n),
            format_percent(pending)
        ),
        RequiredGrade::FullyEvaluated { satisfied: true } => {
            "Target reached (evaluation complete)".to_string()
        }
        RequiredGrade::FullyEvaluated { satisfied: false } => {
            "This target can no longer be reached (evaluation complete)".to_string()
        }
        RequiredGrade::Unreachable => "This target is out of reach with the current grades".to_string(),
    }
}

fn format_objective(idx: usize, objective: &Objective, grades: &[GradeEntry], use_colors: bool) -> String {
    let average = weighted_average(grades);
    let state = objective.state();
    let mark = match state {
        ObjectiveState::Completed => "[x]",
        ObjectiveState::Pending => "[ ]",
    };
    let qualifies = objective_qualifies(objective, average);

    let mut header = format!(
        "{:>2}. {} {}  target {:.1}",
        idx + 1,
        mark,
        objective.description,
        objective.target_grade
    );
    match (state, qualifies) {
        (ObjectiveState::Pending, true) => header.push_str("  (qualifies now)"),
        (ObjectiveState::Completed, false) => header.push_str("  (no longer qualifies)"),
        _ => {}
    }
    if use_colors && state == ObjectiveState::Completed {
        header = if qualifies {
            header.green().to_string()
        } else {
            header.yellow().to_string()
        };
    }

    if state == ObjectiveState::Completed {
        return header;
    }

    let pending = pending_percentage(grades);
    let required = required_future_grade(grades, objective.target_grade);
    let detail = format!(
        "      Progress {:.1} / {:.1}. {}",
        average,
        objective.target_grade,
        format_required_grade(required, pending)
    );
    let detail = if use_colors && !required.is_reachable() {
        detail.red().to_string()
    } else {
        detail
    };
    format!("{}\n{}", header, detail)
}

/// Objectives of a subject, each with its stored flag, live qualification
/// and projection
pub fn format_objectives(subject: &Subject, use_colors: bool) -> String {
    let mut lines = vec![format!(
        "Objectives for {} (current average {})",
        subject.name,
        format_grade(weighted_average(&subject.grades))
    )];

    if subject.objectives.is_empty() {
        lines.push("No objectives defined for this subject.".to_string());
    } else {
        for (idx, objective) in subject.objectives.iter().enumerate() {
            lines.push(format_objective(idx, objective, &subject.grades, use_colors));
        }
    }
    lines.join("\n")
}
