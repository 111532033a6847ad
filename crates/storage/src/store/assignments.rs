#![forbid(unsafe_code)]

use super::{
    CourseAssignmentRow, ElectiveAssignmentRow, NewCourseAssignment, NewElectiveAssignment,
    SqliteStore, StoreError, canonical_id, map_insert_conflict,
};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// The (course, faculty, semester, batch) tuple is enforced by a unique
    /// index; a duplicate insert surfaces as `Duplicate` without any prior
    /// existence query.
    pub fn assign_course_faculty(
        &mut self,
        request: NewCourseAssignment,
    ) -> Result<CourseAssignmentRow, StoreError> {
        let course_code = canonical_id(&request.course_code, "invalid course code")?;
        let faculty_id = canonical_id(&request.faculty_id, "invalid faculty id")?;

        let insert = self.conn_mut().execute(
            "INSERT INTO course_faculty_assignments(course_code, faculty_id, semester, batch) \
             VALUES (?1, ?2, ?3, ?4)",
            params![course_code, faculty_id, request.semester, request.batch],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, "assignment"));
        }
        let id = self.conn().last_insert_rowid();
        Ok(CourseAssignmentRow {
            id,
            course_code,
            faculty_id,
            semester: request.semester,
            batch: request.batch,
        })
    }

    pub fn update_course_assignment(
        &mut self,
        id: i64,
        request: NewCourseAssignment,
    ) -> Result<CourseAssignmentRow, StoreError> {
        let course_code = canonical_id(&request.course_code, "invalid course code")?;
        let faculty_id = canonical_id(&request.faculty_id, "invalid faculty id")?;

        let updated = self.conn_mut().execute(
            "UPDATE course_faculty_assignments \
             SET course_code=?2, faculty_id=?3, semester=?4, batch=?5 WHERE id=?1",
            params![id, course_code, faculty_id, request.semester, request.batch],
        );
        match updated {
            Ok(0) => Err(StoreError::UnknownId),
            Ok(_) => Ok(CourseAssignmentRow {
                id,
                course_code,
                faculty_id,
                semester: request.semester,
                batch: request.batch,
            }),
            Err(err) => Err(map_insert_conflict(err, "assignment")),
        }
    }

    pub fn list_course_assignments(&self) -> Result<Vec<CourseAssignmentRow>, StoreError> {
        self.query_course_assignments(
            "SELECT id, course_code, faculty_id, semester, batch \
             FROM course_faculty_assignments ORDER BY semester ASC, batch ASC, id ASC",
            params![],
        )
    }

    pub fn course_assignments_by_semester_batch(
        &self,
        semester: i64,
        batch: &str,
    ) -> Result<Vec<CourseAssignmentRow>, StoreError> {
        self.query_course_assignments(
            "SELECT id, course_code, faculty_id, semester, batch \
             FROM course_faculty_assignments WHERE semester=?1 AND batch=?2 ORDER BY id ASC",
            params![semester, batch],
        )
    }

    pub fn course_assignments_by_faculty(
        &self,
        faculty_id: &str,
    ) -> Result<Vec<CourseAssignmentRow>, StoreError> {
        self.query_course_assignments(
            "SELECT id, course_code, faculty_id, semester, batch \
             FROM course_faculty_assignments WHERE faculty_id=?1 \
             ORDER BY semester ASC, batch ASC, id ASC",
            params![faculty_id],
        )
    }

    pub fn delete_course_assignment(&mut self, id: i64) -> Result<(), StoreError> {
        let deleted = self.conn_mut().execute(
            "DELETE FROM course_faculty_assignments WHERE id=?1",
            params![id],
        )?;
        if deleted == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    pub fn delete_assignments_by_course(&mut self, course_code: &str) -> Result<usize, StoreError> {
        Ok(self.conn_mut().execute(
            "DELETE FROM course_faculty_assignments WHERE course_code=?1",
            params![course_code],
        )?)
    }

    pub fn delete_assignments_by_faculty(&mut self, faculty_id: &str) -> Result<usize, StoreError> {
        Ok(self.conn_mut().execute(
            "DELETE FROM course_faculty_assignments WHERE faculty_id=?1",
            params![faculty_id],
        )?)
    }

    pub fn assign_elective_faculty(
        &mut self,
        request: NewElectiveAssignment,
    ) -> Result<ElectiveAssignmentRow, StoreError> {
        let elective_code = canonical_id(&request.elective_code, "invalid elective code")?;
        let faculty_id = canonical_id(&request.faculty_id, "invalid faculty id")?;

        let insert = self.conn_mut().execute(
            "INSERT INTO elective_faculty_assignments(elective_code, faculty_id, batch) \
             VALUES (?1, ?2, ?3)",
            params![elective_code, faculty_id, request.batch],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, "elective assignment"));
        }
        let id = self.conn().last_insert_rowid();
        Ok(ElectiveAssignmentRow {
            id,
            elective_code,
            faculty_id,
            batch: request.batch,
        })
    }

    pub fn list_elective_assignments(&self) -> Result<Vec<ElectiveAssignmentRow>, StoreError> {
        self.query_elective_assignments(
            "SELECT id, elective_code, faculty_id, batch \
             FROM elective_faculty_assignments ORDER BY elective_code ASC, batch ASC, id ASC",
            params![],
        )
    }

    pub fn elective_assignments_by_faculty(
        &self,
        faculty_id: &str,
    ) -> Result<Vec<ElectiveAssignmentRow>, StoreError> {
        self.query_elective_assignments(
            "SELECT id, elective_code, faculty_id, batch \
             FROM elective_faculty_assignments WHERE faculty_id=?1 ORDER BY id ASC",
            params![faculty_id],
        )
    }

    pub fn elective_assignments_for(
        &self,
        elective_code: &str,
        batch: i64,
    ) -> Result<Vec<ElectiveAssignmentRow>, StoreError> {
        self.query_elective_assignments(
            "SELECT id, elective_code, faculty_id, batch \
             FROM elective_faculty_assignments WHERE elective_code=?1 AND batch=?2 ORDER BY id ASC",
            params![elective_code, batch],
        )
    }

    pub fn delete_elective_assignment(&mut self, id: i64) -> Result<(), StoreError> {
        let deleted = self.conn_mut().execute(
            "DELETE FROM elective_faculty_assignments WHERE id=?1",
            params![id],
        )?;
        if deleted == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    fn query_course_assignments(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<CourseAssignmentRow>, StoreError> {
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(CourseAssignmentRow {
                id: row.get(0)?,
                course_code: row.get(1)?,
                faculty_id: row.get(2)?,
                semester: row.get(3)?,
                batch: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn query_elective_assignments(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<ElectiveAssignmentRow>, StoreError> {
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(ElectiveAssignmentRow {
                id: row.get(0)?,
                elective_code: row.get(1)?,
                faculty_id: row.get(2)?,
                batch: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
