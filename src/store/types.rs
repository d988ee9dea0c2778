use serde::{Deserialize, Serialize};

/// Credits given to a subject when the stored document does not carry any
pub const DEFAULT_CREDITS: f64 = 6.0;

/// One scored component of a subject's final grade.
///
/// `weight` is a percentage (0-100) of the subject's total grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "ponderacion")]
    pub weight: f64,
}

/// A target average for a subject plus the user-confirmed completion flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "notaObjetivo")]
    pub target_grade: f64,
    #[serde(rename = "completado", default)]
    pub completed: bool,
}

impl Objective {
    pub fn state(&self) -> ObjectiveState {
        if self.completed {
            ObjectiveState::Completed
        } else {
            ObjectiveState::Pending
        }
    }
}

/// Stored completion state. Only explicit user actions move between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveState {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "profesor", default)]
    pub professor: String,
    #[serde(rename = "creditos", default = "default_credits")]
    pub credits: f64,
    #[serde(default)]
    pub color: String,
    #[serde(rename = "notas", default)]
    pub grades: Vec<GradeEntry>,
    // Older documents predate objectives entirely
    #[serde(rename = "objetivos", default)]
    pub objectives: Vec<Objective>,
}

fn default_credits() -> f64 {
    DEFAULT_CREDITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_without_objectives_defaults_to_empty() {
        let json = r##"{
            "id": "1700000000000",
            "nombre": "Matemáticas",
            "profesor": "García",
            "creditos": 6,
            "color": "#60a5fa",
            "notas": [
                { "id": "1700000000001", "nombre": "Parcial", "valor": 7.5, "ponderacion": 40 }
            ]
        }"##;

        let subject: Subject = serde_json::from_str(json).unwrap();
        assert_eq!(subject.name, "Matemáticas");
        assert_eq!(subject.grades.len(), 1);
        assert_eq!(subject.grades[0].weight, 40.0);
        assert!(subject.objectives.is_empty());
    }

    #[test]
    fn test_missing_optional_subject_fields() {
        let json = r#"{ "id": "1", "nombre": "Lengua" }"#;
        let subject: Subject = serde_json::from_str(json).unwrap();
        assert_eq!(subject.professor, "");
        assert_eq!(subject.credits, DEFAULT_CREDITS);
        assert!(subject.grades.is_empty());
    }

    #[test]
    fn test_serializes_original_field_names() {
        let subject = Subject {
            id: "s1".to_string(),
            name: "Física".to_string(),
            professor: "Pérez".to_string(),
            credits: 4.5,
            color: "#f87171".to_string(),
            grades: vec![GradeEntry {
                id: "g1".to_string(),
                name: "Lab".to_string(),
                value: 8.0,
                weight: 20.0,
            }],
            objectives: vec![Objective {
                id: "o1".to_string(),
                description: "Aprobar".to_string(),
                target_grade: 5.0,
                completed: false,
            }],
        };

        let value = serde_json::to_value(&subject).unwrap();
        assert_eq!(value["nombre"], "Física");
        assert_eq!(value["creditos"], 4.5);
        assert_eq!(value["notas"][0]["valor"], 8.0);
        assert_eq!(value["notas"][0]["ponderacion"], 20.0);
        assert_eq!(value["objetivos"][0]["notaObjetivo"], 5.0);
        assert_eq!(value["objetivos"][0]["completado"], false);
    }

    #[test]
    fn test_objective_state_follows_flag() {
        let mut objective = Objective {
            id: "o1".to_string(),
            description: "Notable".to_string(),
            target_grade: 7.0,
            completed: false,
        };
        assert_eq!(objective.state(), ObjectiveState::Pending);
        objective.completed = true;
        assert_eq!(objective.state(), ObjectiveState::Completed);
    }
}
