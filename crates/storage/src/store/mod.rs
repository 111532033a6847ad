#![forbid(unsafe_code)]

mod assignments;
mod courses;
mod elective_choices;
mod electives;
mod error;
mod faculty;
mod feedback;
mod grievances;
mod notifications;
mod requests;
mod rows;
mod students;
mod users;

pub use error::StoreError;
pub use requests::*;
pub use rows::*;

use rusqlite::{Connection, ErrorCode, OptionalExtension, Transaction, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA_VERSION: &str = "v1";
const DB_FILE: &str = "dept_portal.db";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;

        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counters (
          name TEXT PRIMARY KEY,
          value INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
          id TEXT NOT NULL,
          role TEXT NOT NULL,
          name TEXT NOT NULL,
          password TEXT NOT NULL,
          email TEXT,
          PRIMARY KEY (id, role)
        );

        CREATE TABLE IF NOT EXISTS students (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          email TEXT,
          batch TEXT NOT NULL,
          joined_year INTEGER NOT NULL,
          current_semester INTEGER NOT NULL,
          feedback_given INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS faculty (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          designation TEXT
        );

        CREATE TABLE IF NOT EXISTS courses (
          code TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          semester INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS elective_courses (
          code TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          semester INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS course_faculty_assignments (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          course_code TEXT NOT NULL,
          faculty_id TEXT NOT NULL,
          semester INTEGER NOT NULL,
          batch TEXT NOT NULL,
          UNIQUE (course_code, faculty_id, semester, batch)
        );

        CREATE TABLE IF NOT EXISTS elective_faculty_assignments (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          elective_code TEXT NOT NULL,
          faculty_id TEXT NOT NULL,
          batch INTEGER NOT NULL,
          UNIQUE (elective_code, faculty_id, batch)
        );

        CREATE TABLE IF NOT EXISTS elective_student_assignments (
          student_id TEXT PRIMARY KEY,
          electives_json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS feedback (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          student_id TEXT NOT NULL,
          faculty_id TEXT NOT NULL,
          course_code TEXT NOT NULL,
          batch TEXT NOT NULL,
          semester INTEGER NOT NULL,
          ratings_json TEXT NOT NULL,
          comments TEXT,
          score REAL NOT NULL,
          created_at_ms INTEGER NOT NULL,
          UNIQUE (student_id, course_code, batch, semester)
        );

        CREATE TABLE IF NOT EXISTS grievances (
          id TEXT PRIMARY KEY,
          student_id TEXT NOT NULL,
          faculty_id TEXT,
          course_code TEXT,
          batch TEXT NOT NULL,
          semester INTEGER NOT NULL,
          category TEXT NOT NULL,
          subject TEXT NOT NULL,
          body TEXT NOT NULL,
          status TEXT NOT NULL,
          admin_response TEXT,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS notifications (
          id TEXT PRIMARY KEY,
          student_id TEXT NOT NULL,
          grievance_id TEXT NOT NULL,
          message TEXT NOT NULL,
          is_read INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_feedback_faculty ON feedback(faculty_id);
        CREATE INDEX IF NOT EXISTS idx_cfa_faculty ON course_faculty_assignments(faculty_id);
        CREATE INDEX IF NOT EXISTS idx_cfa_course ON course_faculty_assignments(course_code);
        CREATE INDEX IF NOT EXISTS idx_efa_faculty ON elective_faculty_assignments(faculty_id);
        CREATE INDEX IF NOT EXISTS idx_efa_elective ON elective_faculty_assignments(elective_code);
        CREATE INDEX IF NOT EXISTS idx_grievances_student ON grievances(student_id);
        CREATE INDEX IF NOT EXISTS idx_notifications_student ON notifications(student_id);
        "#,
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;
    Ok(())
}

pub(crate) fn canonical_id(value: &str, what: &'static str) -> Result<String, StoreError> {
    dp_core::canonical_id(value).map_err(|_| StoreError::InvalidInput(what))
}

pub(crate) fn next_counter_tx(tx: &Transaction<'_>, name: &str) -> Result<i64, StoreError> {
    let current: i64 = tx
        .query_row(
            "SELECT value FROM counters WHERE name=?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let next = current + 1;
    tx.execute(
        "INSERT INTO counters(name, value) VALUES (?1, ?2) \
         ON CONFLICT(name) DO UPDATE SET value=excluded.value",
        params![name, next],
    )?;
    Ok(next)
}

pub(crate) fn map_insert_conflict(err: rusqlite::Error, what: &'static str) -> StoreError {
    if is_constraint_violation(&err) {
        return StoreError::Duplicate(what);
    }
    StoreError::Sql(err)
}

pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}

pub(crate) fn cascade_step<T>(
    step: &'static str,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    result.map_err(|err| StoreError::CascadeStep {
        step,
        message: err.to_string(),
    })
}
