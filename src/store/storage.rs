use super::book::GradeBook;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the data document, after the browser storage key
pub const DATA_FILE_NAME: &str = "asignaturas.json";

/// Get the default data file path (~/.config/gradebook/asignaturas.json)
pub fn get_data_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join(DATA_FILE_NAME))
}

/// Read a grade book document from disk.
///
/// Subjects saved before objectives existed load with an empty objective list.
pub fn read_book(path: &Path) -> Result<GradeBook> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open grade data at {}", path.display()))?;

    let book: GradeBook = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse grade data in {}", path.display()))?;

    Ok(book)
}

/// Load the grade book from its data file
///
/// If the file doesn't exist, returns a new empty book.
pub fn load_book(path: &Path) -> Result<GradeBook> {
    if !path.exists() {
        debug!(path = %path.display(), "No data file yet, starting empty");
        return Ok(GradeBook::new());
    }

    let book = read_book(path)?;
    debug!(path = %path.display(), subjects = book.len(), "Loaded grade book");
    Ok(book)
}

/// Write the grade book as pretty JSON, atomically
///
/// The file is never left half-written. Missing parent directories are created.
pub fn save_book(path: &Path, book: &GradeBook) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, book).context("Failed to serialize grade book")?;

    file.commit()
        .with_context(|| format!("Failed to save grade book to {}", path.display()))?;

    debug!(path = %path.display(), subjects = book.len(), "Saved grade book");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::book::{NewGrade, NewSubject};
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        let book = load_book(&dir.path().join("missing.json")).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(DATA_FILE_NAME);

        let mut book = GradeBook::new();
        let id = book
            .add_subject(NewSubject {
                name: "Matemáticas".to_string(),
                ..NewSubject::default()
            })
            .unwrap();
        book.add_grade(
            &id,
            NewGrade {
                name: "Parcial".to_string(),
                value: 7.5,
                weight: 40.0,
            },
        )
        .unwrap();

        save_book(&path, &book).unwrap();
        let loaded = load_book(&path).unwrap();
        assert_eq!(loaded, book);
    }

    #[test]
    fn test_loads_document_from_browser_app() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DATA_FILE_NAME);
        fs::write(
            &path,
            r##"[
  {
    "id": "1712345678901",
    "nombre": "Lengua",
    "profesor": "Ruiz",
    "creditos": 6,
    "color": "#a78bfa",
    "notas": [
      { "id": "1712345678950", "nombre": "Examen", "valor": 4.5, "ponderacion": 20 },
      { "id": "1712345679000", "nombre": "Trabajo", "valor": 5.2, "ponderacion": 50 }
    ]
  }
]"##,
        )
        .unwrap();

        let book = load_book(&path).unwrap();
        let subject = book.find_subject("lengua").unwrap();
        assert_eq!(subject.grades.len(), 2);
        assert!(subject.objectives.is_empty());
    }

    #[test]
    fn test_loads_fractional_credits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DATA_FILE_NAME);
        fs::write(
            &path,
            r##"[
  { "id": "1", "nombre": "Redes", "profesor": "", "creditos": 4.5, "color": "#4ade80", "notas": [] },
  { "id": "2", "nombre": "Álgebra", "profesor": "", "creditos": 6, "color": "#f87171", "notas": [] }
]"##,
        )
        .unwrap();

        let book = load_book(&path).unwrap();
        assert_eq!(book.find_subject("redes").unwrap().credits, 4.5);
        assert_eq!(book.find_subject("álgebra").unwrap().credits, 6.0);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DATA_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = load_book(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse grade data"));
    }
}
