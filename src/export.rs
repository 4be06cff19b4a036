use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::db::Student;

/// Default location of the export slot, relative to the working directory.
pub const DEFAULT_SLOT_PATH: &str = "students.json";

/// A single-slot JSON file holding at most one student record.
///
/// Every write overwrites the previous content; there is no appending or
/// indexing. File handles are scoped to each call, so they are released on
/// success and on every error path alike.
#[derive(Debug, Clone)]
pub struct StudentSlot {
    path: PathBuf,
}

impl StudentSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `student` into the slot, replacing whatever was there.
    pub fn write(&self, student: &Student) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        serde_json::to_writer(file, student)
            .with_context(|| format!("Failed to write student to {}", self.path.display()))?;
        Ok(())
    }

    /// Deserialize the single record from the slot.
    pub fn read(&self) -> Result<Student> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let student = serde_json::from_reader(file)
            .with_context(|| format!("Failed to read student from {}", self.path.display()))?;
        Ok(student)
    }
}

impl Default for StudentSlot {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Student {
        Student {
            id: Some(7),
            name: "Test Student".to_string(),
            email: "test@uncg.edu".to_string(),
            major: "Biology".to_string(),
            gpa: 3.5,
        }
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let slot = StudentSlot::new(dir.path().join("students.json"));

        let student = sample();
        slot.write(&student).unwrap();

        let read_back = slot.read().unwrap();
        assert_eq!(read_back, student);
    }

    #[test]
    fn test_write_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let slot = StudentSlot::new(dir.path().join("students.json"));

        slot.write(&sample()).unwrap();

        let mut second = sample();
        second.id = Some(8);
        second.name = "Someone Else".to_string();
        slot.write(&second).unwrap();

        assert_eq!(slot.read().unwrap(), second);
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let slot = StudentSlot::new(dir.path().join("nope.json"));

        assert!(slot.read().is_err());
    }

    #[test]
    fn test_read_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(&path, "{not json").unwrap();

        let slot = StudentSlot::new(path);
        assert!(slot.read().is_err());
    }
}
