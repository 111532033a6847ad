#![forbid(unsafe_code)]

use super::{
    CourseRow, CourseUpdate, NewCourse, SqliteStore, StoreError, canonical_id, cascade_step,
    map_insert_conflict,
};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    pub fn insert_course(&mut self, request: NewCourse) -> Result<CourseRow, StoreError> {
        let code = canonical_id(&request.code, "invalid course code")?;
        let insert = self.conn_mut().execute(
            "INSERT INTO courses(code, name, semester) VALUES (?1, ?2, ?3)",
            params![code, request.name, request.semester],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, "course"));
        }
        Ok(CourseRow {
            code,
            name: request.name,
            semester: request.semester,
        })
    }

    pub fn get_course(&self, code: &str) -> Result<Option<CourseRow>, StoreError> {
        Ok(self
            .conn()
            .query_row(
                "SELECT code, name, semester FROM courses WHERE code=?1",
                params![code],
                map_course_row,
            )
            .optional()?)
    }

    pub fn list_courses(&self) -> Result<Vec<CourseRow>, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT code, name, semester FROM courses ORDER BY code ASC")?;
        let rows = stmt.query_map([], map_course_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn courses_by_semester(&self, semester: i64) -> Result<Vec<CourseRow>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT code, name, semester FROM courses WHERE semester=?1 ORDER BY code ASC",
        )?;
        let rows = stmt.query_map(params![semester], map_course_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn update_course(
        &mut self,
        code: &str,
        update: CourseUpdate,
    ) -> Result<CourseRow, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let current = tx
            .query_row(
                "SELECT code, name, semester FROM courses WHERE code=?1",
                params![code],
                map_course_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Err(StoreError::UnknownId);
        };

        let next = CourseRow {
            code: current.code,
            name: update.name.unwrap_or(current.name),
            semester: update.semester.unwrap_or(current.semester),
        };

        tx.execute(
            "UPDATE courses SET name=?2, semester=?3 WHERE code=?1",
            params![next.code, next.name, next.semester],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Cascade: assignments referencing the course go first, the course row
    /// last. Returns the number of assignments removed.
    pub fn delete_course(&mut self, code: &str) -> Result<usize, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let exists = tx
            .query_row("SELECT 1 FROM courses WHERE code=?1", params![code], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::UnknownId);
        }

        let assignments_deleted = cascade_step(
            "assignments",
            tx.execute(
                "DELETE FROM course_faculty_assignments WHERE course_code=?1",
                params![code],
            )
            .map_err(StoreError::from),
        )?;
        cascade_step(
            "course",
            tx.execute("DELETE FROM courses WHERE code=?1", params![code])
                .map_err(StoreError::from),
        )?;

        tx.commit()?;
        Ok(assignments_deleted)
    }

    /// Bulk cascade for a semester's worth of courses. Returns
    /// `(courses_deleted, assignments_deleted)`.
    pub fn delete_courses_by_semester(
        &mut self,
        semester: i64,
    ) -> Result<(usize, usize), StoreError> {
        let tx = self.conn_mut().transaction()?;

        let assignments_deleted = cascade_step(
            "assignments",
            tx.execute(
                "DELETE FROM course_faculty_assignments WHERE course_code IN \
                 (SELECT code FROM courses WHERE semester=?1)",
                params![semester],
            )
            .map_err(StoreError::from),
        )?;
        let courses_deleted = cascade_step(
            "courses",
            tx.execute("DELETE FROM courses WHERE semester=?1", params![semester])
                .map_err(StoreError::from),
        )?;

        tx.commit()?;
        Ok((courses_deleted, assignments_deleted))
    }
}

fn map_course_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CourseRow> {
    Ok(CourseRow {
        code: row.get(0)?,
        name: row.get(1)?,
        semester: row.get(2)?,
    })
}
