use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// One student record.
///
/// `id` is `None` until the store assigns a rowid on insert. GPA is expected
/// to fall in 0.0–4.0 but is not validated here; name and email carry no
/// uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub major: String,
    pub gpa: f64,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            major TEXT NOT NULL,
            gpa REAL NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_name ON students(name)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_major ON students(major)",
        [],
    )?;

    Ok(())
}

fn row_to_student(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        major: row.get(3)?,
        gpa: row.get(4)?,
    })
}

/// Keyed storage for student records, backed by a single SQLite table.
///
/// Cloneable handle over a shared connection; handed explicitly to the
/// service at construction time rather than injected globally.
#[derive(Clone)]
pub struct StudentStore {
    conn: Arc<Mutex<Connection>>,
}

impl StudentStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// All records, in primary-key order.
    pub fn find_all(&self) -> Result<Vec<Student>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, major, gpa FROM students ORDER BY id",
        )?;

        let students = stmt
            .query_map([], row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(students)
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<Student>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, major, gpa FROM students WHERE id = ?1",
        )?;

        let mut rows = stmt.query_map(params![id], row_to_student)?;

        match rows.next() {
            Some(student) => Ok(Some(student?)),
            None => Ok(None),
        }
    }

    /// Exact-match name filter. Case rules are whatever the storage
    /// engine's default collation does.
    pub fn find_by_name(&self, name: &str) -> Result<Vec<Student>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, major, gpa FROM students WHERE name = ?1 ORDER BY id",
        )?;

        let students = stmt
            .query_map(params![name], row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(students)
    }

    pub fn find_by_major(&self, major: &str) -> Result<Vec<Student>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, major, gpa FROM students WHERE major = ?1 ORDER BY id",
        )?;

        let students = stmt
            .query_map(params![major], row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(students)
    }

    /// Records with `gpa >= threshold`.
    pub fn find_by_min_gpa(&self, threshold: f64) -> Result<Vec<Student>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, major, gpa FROM students WHERE gpa >= ?1 ORDER BY id",
        )?;

        let students = stmt
            .query_map(params![threshold], row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(students)
    }

    /// Insert-or-update. A record without an id is inserted and gets a
    /// fresh rowid; a record carrying an id overwrites the row with that
    /// id, inserting it if no such row exists. Returns the persisted
    /// record with its id set.
    pub fn save(&self, student: &Student) -> Result<Student> {
        let conn = self.conn.lock().unwrap();

        match student.id {
            Some(id) => {
                conn.execute(
                    "INSERT OR REPLACE INTO students (id, name, email, major, gpa)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![id, student.name, student.email, student.major, student.gpa],
                )
                .context("Failed to save student")?;

                Ok(student.clone())
            }
            None => {
                conn.execute(
                    "INSERT INTO students (name, email, major, gpa)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![student.name, student.email, student.major, student.gpa],
                )
                .context("Failed to insert student")?;

                let mut persisted = student.clone();
                persisted.id = Some(conn.last_insert_rowid());
                Ok(persisted)
            }
        }
    }

    /// Removes the row if present; silently does nothing otherwise.
    pub fn delete_by_id(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM students WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }
}
