#![forbid(unsafe_code)]

use super::elective_choices::pull_elective_tx;
use super::{
    ElectiveCascade, ElectiveCourseRow, NewElectiveCourse, SqliteStore, StoreError, canonical_id,
    cascade_step, map_insert_conflict,
};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    pub fn insert_elective_course(
        &mut self,
        request: NewElectiveCourse,
    ) -> Result<ElectiveCourseRow, StoreError> {
        let code = canonical_id(&request.code, "invalid elective code")?;
        let insert = self.conn_mut().execute(
            "INSERT INTO elective_courses(code, name, semester) VALUES (?1, ?2, ?3)",
            params![code, request.name, request.semester],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, "elective course"));
        }
        Ok(ElectiveCourseRow {
            code,
            name: request.name,
            semester: request.semester,
        })
    }

    pub fn get_elective_course(&self, code: &str) -> Result<Option<ElectiveCourseRow>, StoreError> {
        Ok(self
            .conn()
            .query_row(
                "SELECT code, name, semester FROM elective_courses WHERE code=?1",
                params![code],
                map_elective_row,
            )
            .optional()?)
    }

    pub fn list_elective_courses(&self) -> Result<Vec<ElectiveCourseRow>, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT code, name, semester FROM elective_courses ORDER BY code ASC")?;
        let rows = stmt.query_map([], map_elective_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Cascade: faculty assignments for the elective, then a document-wide
    /// pull of the elective from every student's embedded list, then the
    /// elective row itself.
    pub fn delete_elective_course(&mut self, code: &str) -> Result<ElectiveCascade, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM elective_courses WHERE code=?1",
                params![code],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::UnknownId);
        }

        let faculty_assignments_deleted = cascade_step(
            "faculty assignments",
            tx.execute(
                "DELETE FROM elective_faculty_assignments WHERE elective_code=?1",
                params![code],
            )
            .map_err(StoreError::from),
        )?;
        let student_choices_pulled =
            cascade_step("student electives", pull_elective_tx(&tx, code))?;
        cascade_step(
            "elective",
            tx.execute("DELETE FROM elective_courses WHERE code=?1", params![code])
                .map_err(StoreError::from),
        )?;

        tx.commit()?;
        Ok(ElectiveCascade {
            faculty_assignments_deleted,
            student_choices_pulled,
        })
    }
}

fn map_elective_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ElectiveCourseRow> {
    Ok(ElectiveCourseRow {
        code: row.get(0)?,
        name: row.get(1)?,
        semester: row.get(2)?,
    })
}
