use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::BookError;
use super::types::{GradeEntry, Objective, Subject, DEFAULT_CREDITS};
use crate::grading::engine::WEIGHT_EPSILON;
use crate::grading::{
    objective_qualifies, percentage_evaluated, validate_grade, validate_objective,
    validate_subject_name, validate_weight_set, weighted_average, FULL_WEIGHT,
};

/// Colors handed out to new subjects, in rotation
pub const PALETTE: [&str; 7] = [
    "#f87171", // red
    "#fb923c", // orange
    "#facc15", // yellow
    "#4ade80", // green
    "#60a5fa", // blue
    "#a78bfa", // purple
    "#f472b6", // pink
];

pub type BookResult<T> = Result<T, BookError>;

#[derive(Debug, Clone, Default)]
pub struct NewSubject {
    pub name: String,
    pub professor: String,
    pub credits: Option<f64>,
    pub color: Option<String>,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub professor: Option<String>,
    pub credits: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewGrade {
    pub name: String,
    pub value: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct GradePatch {
    pub name: Option<String>,
    pub value: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewObjective {
    pub description: String,
    pub target_grade: f64,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Match on exact id first, then on a case-insensitive label.
fn position_by_key<T>(
    items: &[T],
    key: &str,
    id: impl Fn(&T) -> &str,
    label: impl Fn(&T) -> &str,
) -> Option<usize> {
    items
        .iter()
        .position(|item| id(item) == key)
        .or_else(|| {
            let key = key.trim().to_lowercase();
            items.iter().position(|item| label(item).to_lowercase() == key)
        })
}

/// The canonical collection of subjects.
///
/// Serializes as a bare JSON array of subjects, the same document the
/// browser app kept under its `asignaturas` storage key. Grade math never
/// reads the book directly; callers take a [`snapshot`](Self::snapshot) or
/// borrow a subject's entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeBook {
    subjects: Vec<Subject>,
}

impl GradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent copy of every subject at this point in time.
    pub fn snapshot(&self) -> Vec<Subject> {
        self.subjects.clone()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    fn subject_index(&self, key: &str) -> BookResult<usize> {
        position_by_key(&self.subjects, key, |s| s.id.as_str(), |s| s.name.as_str())
            .ok_or_else(|| BookError::SubjectNotFound(key.to_string()))
    }

    fn subject_mut(&mut self, key: &str) -> BookResult<&mut Subject> {
        let idx = self.subject_index(key)?;
        Ok(&mut self.subjects[idx])
    }

    /// Look up a subject by id or (case-insensitive) name.
    pub fn find_subject(&self, key: &str) -> BookResult<&Subject> {
        let idx = self.subject_index(key)?;
        Ok(&self.subjects[idx])
    }

    pub fn find_grade(&self, subject_key: &str, grade_key: &str) -> BookResult<&GradeEntry> {
        let subject = self.find_subject(subject_key)?;
        position_by_key(&subject.grades, grade_key, |g| g.id.as_str(), |g| g.name.as_str())
            .map(|idx| &subject.grades[idx])
            .ok_or_else(|| BookError::GradeNotFound {
                subject: subject.name.clone(),
                grade: grade_key.to_string(),
            })
    }

    pub fn find_objective(&self, subject_key: &str, objective_key: &str) -> BookResult<&Objective> {
        let subject = self.find_subject(subject_key)?;
        position_by_key(&subject.objectives, objective_key, |o| o.id.as_str(), |o| o.description.as_str())
            .map(|idx| &subject.objectives[idx])
            .ok_or_else(|| BookError::ObjectiveNotFound {
                subject: subject.name.clone(),
                objective: objective_key.to_string(),
            })
    }

    fn next_color(&self) -> String {
        PALETTE[self.subjects.len() % PALETTE.len()].to_string()
    }

    pub fn add_subject(&mut self, new: NewSubject) -> BookResult<String> {
        validate_subject_name(&new.name)?;

        let subject = Subject {
            id: new_id(),
            name: new.name.trim().to_string(),
            professor: new.professor,
            credits: new.credits.unwrap_or(DEFAULT_CREDITS),
            color: new.color.unwrap_or_else(|| self.next_color()),
            grades: Vec::new(),
            objectives: Vec::new(),
        };
        let id = subject.id.clone();
        debug!(subject = %subject.name, id = %id, "Added subject");
        self.subjects.push(subject);
        Ok(id)
    }

    pub fn update_subject(&mut self, key: &str, patch: SubjectPatch) -> BookResult<()> {
        if let Some(ref name) = patch.name {
            validate_subject_name(name)?;
        }

        let subject = self.subject_mut(key)?;
        if let Some(name) = patch.name {
            subject.name = name.trim().to_string();
        }
        if let Some(professor) = patch.professor {
            subject.professor = professor;
        }
        if let Some(credits) = patch.credits {
            subject.credits = credits;
        }
        if let Some(color) = patch.color {
            subject.color = color;
        }
        debug!(subject = %subject.name, "Updated subject");
        Ok(())
    }

    pub fn remove_subject(&mut self, key: &str) -> BookResult<Subject> {
        let idx = self.subject_index(key)?;
        let removed = self.subjects.remove(idx);
        debug!(subject = %removed.name, "Removed subject");
        Ok(removed)
    }

    pub fn add_grade(&mut self, subject_key: &str, new: NewGrade) -> BookResult<String> {
        validate_grade(&new.name, new.value, new.weight)?;

        let subject = self.subject_mut(subject_key)?;
        let grade = GradeEntry {
            id: new_id(),
            name: new.name.trim().to_string(),
            value: new.value,
            weight: new.weight,
        };
        let id = grade.id.clone();
        subject.grades.push(grade);
        warn_if_over_weighted(subject);
        debug!(subject = %subject.name, grade = %id, "Added grade");
        Ok(id)
    }

    pub fn update_grade(
        &mut self,
        subject_key: &str,
        grade_key: &str,
        patch: GradePatch,
    ) -> BookResult<()> {
        let current = self.find_grade(subject_key, grade_key)?.clone();
        let updated = GradeEntry {
            name: patch.name.map(|n| n.trim().to_string()).unwrap_or(current.name),
            value: patch.value.unwrap_or(current.value),
            weight: patch.weight.unwrap_or(current.weight),
            id: current.id,
        };
        validate_grade(&updated.name, updated.value, updated.weight)?;

        let subject = self.subject_mut(subject_key)?;
        if let Some(slot) = subject.grades.iter_mut().find(|g| g.id == updated.id) {
            *slot = updated;
        }
        warn_if_over_weighted(subject);
        debug!(subject = %subject.name, "Updated grade");
        Ok(())
    }

    pub fn remove_grade(&mut self, subject_key: &str, grade_key: &str) -> BookResult<GradeEntry> {
        let id = self.find_grade(subject_key, grade_key)?.id.clone();
        let subject = self.subject_mut(subject_key)?;
        let idx = subject
            .grades
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| BookError::GradeNotFound {
                subject: subject.name.clone(),
                grade: grade_key.to_string(),
            })?;
        Ok(subject.grades.remove(idx))
    }

    /// Create a subject with all its grades at once.
    ///
    /// Grades are paired positionally with weights, which must cover the
    /// whole subject; they are rescaled to add up to exactly 100. Entries
    /// are named "Grade 1", "Grade 2", ...
    pub fn quick_subject(&mut self, name: &str, grades: &[f64], weights: &[f64]) -> BookResult<String> {
        let mut errors = Vec::new();
        if let Err(e) = validate_subject_name(name) {
            errors.extend(e);
        }
        if let Err(e) = validate_weight_set(grades, weights) {
            errors.extend(e);
        }
        if !errors.is_empty() {
            return Err(BookError::Invalid(errors));
        }

        let id = self.add_subject(NewSubject {
            name: name.to_string(),
            ..NewSubject::default()
        })?;
        // Accepted sums may be off by up to the tolerance; rescale to a full 100
        let scale = FULL_WEIGHT / weights.iter().sum::<f64>();
        let subject = self.subject_mut(&id)?;
        subject.grades = grades
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(i, (value, weight))| GradeEntry {
                id: new_id(),
                name: format!("Grade {}", i + 1),
                value: *value,
                weight: weight * scale,
            })
            .collect();
        Ok(id)
    }

    /// Add an objective. Its completion flag starts out as whether the
    /// current average already qualifies; afterwards only the user changes it.
    pub fn add_objective(&mut self, subject_key: &str, new: NewObjective) -> BookResult<String> {
        validate_objective(&new.description, new.target_grade)?;

        let subject = self.subject_mut(subject_key)?;
        let mut objective = Objective {
            id: new_id(),
            description: new.description.trim().to_string(),
            target_grade: new.target_grade,
            completed: false,
        };
        objective.completed = objective_qualifies(&objective, weighted_average(&subject.grades));
        let id = objective.id.clone();
        debug!(
            subject = %subject.name,
            objective = %id,
            completed = objective.completed,
            "Added objective"
        );
        subject.objectives.push(objective);
        Ok(id)
    }

    /// Mark or unmark an objective as completed.
    pub fn set_objective_completed(
        &mut self,
        subject_key: &str,
        objective_key: &str,
        completed: bool,
    ) -> BookResult<()> {
        let id = self.find_objective(subject_key, objective_key)?.id.clone();
        let subject = self.subject_mut(subject_key)?;
        if let Some(objective) = subject.objectives.iter_mut().find(|o| o.id == id) {
            objective.completed = completed;
        }
        Ok(())
    }

    pub fn remove_objective(&mut self, subject_key: &str, objective_key: &str) -> BookResult<Objective> {
        let id = self.find_objective(subject_key, objective_key)?.id.clone();
        let subject = self.subject_mut(subject_key)?;
        let idx = subject
            .objectives
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| BookError::ObjectiveNotFound {
                subject: subject.name.clone(),
                objective: objective_key.to_string(),
            })?;
        Ok(subject.objectives.remove(idx))
    }
}

fn warn_if_over_weighted(subject: &Subject) {
    let evaluated = percentage_evaluated(&subject.grades);
    if evaluated > FULL_WEIGHT + WEIGHT_EPSILON {
        warn!(
            subject = %subject.name,
            evaluated,
            "Grade weights add up to more than 100%"
        );
    }
}
