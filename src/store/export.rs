use super::book::GradeBook;
use super::storage::{read_book, save_book};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// Date-stamped name for an export, e.g. `mis_asignaturas_2024-05-31.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("mis_asignaturas_{}.json", date.format("%Y-%m-%d"))
}

/// Write a copy of the book into `dir` and return the path written.
pub fn export_book(dir: &Path, book: &GradeBook, date: NaiveDate) -> Result<PathBuf> {
    let path = dir.join(export_file_name(date));
    save_book(&path, book).with_context(|| format!("Failed to export to {}", path.display()))?;
    info!(path = %path.display(), subjects = book.len(), "Exported grade book");
    Ok(path)
}

/// Read a previously exported document.
pub fn import_book(path: &Path) -> Result<GradeBook> {
    let book = read_book(path).with_context(|| format!("Failed to import {}", path.display()))?;
    info!(path = %path.display(), subjects = book.len(), "Imported grade book");
    Ok(book)
}
