pub mod book;
pub mod error;
pub mod export;
pub mod storage;
pub mod types;

pub use book::{GradeBook, GradePatch, NewGrade, NewObjective, NewSubject, SubjectPatch, PALETTE};
pub use error::BookError;
pub use export::{export_book, export_file_name, import_book};
pub use storage::{get_data_path, load_book, save_book};
pub use types::{GradeEntry, Objective, ObjectiveState, Subject};
