#![forbid(unsafe_code)]

use super::{
    NewStudent, SqliteStore, StoreError, StudentRow, StudentUpdate, canonical_id, cascade_step,
    map_insert_conflict,
};
use rusqlite::{OptionalExtension, Transaction, params};

impl SqliteStore {
    pub fn insert_student(&mut self, request: NewStudent) -> Result<StudentRow, StoreError> {
        let id = canonical_id(&request.id, "invalid student id")?;
        let insert = self.conn_mut().execute(
            "INSERT INTO students(id, name, email, batch, joined_year, current_semester, feedback_given) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
            params![
                id,
                request.name,
                request.email,
                request.batch,
                request.joined_year,
                request.current_semester
            ],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, "student"));
        }
        Ok(StudentRow {
            id,
            name: request.name,
            email: request.email,
            batch: request.batch,
            joined_year: request.joined_year,
            current_semester: request.current_semester,
            feedback_given: false,
        })
    }

    pub fn get_student(&self, id: &str) -> Result<Option<StudentRow>, StoreError> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, name, email, batch, joined_year, current_semester, feedback_given \
                 FROM students WHERE id=?1",
                params![id],
                map_student_row,
            )
            .optional()?)
    }

    pub fn list_students(&self) -> Result<Vec<StudentRow>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, email, batch, joined_year, current_semester, feedback_given \
             FROM students ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], map_student_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn update_student(
        &mut self,
        id: &str,
        update: StudentUpdate,
    ) -> Result<StudentRow, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let Some(current) = student_row_tx(&tx, id)? else {
            return Err(StoreError::UnknownId);
        };

        let next = StudentRow {
            id: current.id,
            name: update.name.unwrap_or(current.name),
            email: update.email.or(current.email),
            batch: update.batch.unwrap_or(current.batch),
            joined_year: update.joined_year.unwrap_or(current.joined_year),
            current_semester: update.current_semester.unwrap_or(current.current_semester),
            feedback_given: update.feedback_given.unwrap_or(current.feedback_given),
        };

        tx.execute(
            "UPDATE students SET name=?2, email=?3, batch=?4, joined_year=?5, \
             current_semester=?6, feedback_given=?7 WHERE id=?1",
            params![
                next.id,
                next.name,
                next.email,
                next.batch,
                next.joined_year,
                next.current_semester,
                next.feedback_given as i64
            ],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Persist a freshly computed semester. A semester change always resets
    /// the feedback-completion flag in the same statement; the two writes are
    /// never allowed to come apart.
    pub fn apply_semester(&mut self, id: &str, semester: i64) -> Result<(), StoreError> {
        let updated = self.conn_mut().execute(
            "UPDATE students SET current_semester=?2, feedback_given=0 WHERE id=?1",
            params![id, semester],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    pub fn set_feedback_given(&mut self, id: &str, given: bool) -> Result<(), StoreError> {
        let updated = self.conn_mut().execute(
            "UPDATE students SET feedback_given=?2 WHERE id=?1",
            params![id, given as i64],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    /// Cascade: credential record first, the student row last.
    pub fn delete_student(&mut self, id: &str) -> Result<(), StoreError> {
        let tx = self.conn_mut().transaction()?;

        if student_row_tx(&tx, id)?.is_none() {
            return Err(StoreError::UnknownId);
        }

        cascade_step(
            "credential",
            tx.execute(
                "DELETE FROM users WHERE id=?1 AND role='student'",
                params![id],
            )
            .map_err(StoreError::from),
        )?;
        cascade_step(
            "student",
            tx.execute("DELETE FROM students WHERE id=?1", params![id])
                .map_err(StoreError::from),
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Bulk cascade for a whole semester: matching credential records by id
    /// set, then the student rows.
    pub fn delete_students_by_semester(&mut self, semester: i64) -> Result<usize, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let ids: Vec<String> = {
            let mut stmt =
                tx.prepare("SELECT id FROM students WHERE current_semester=?1")?;
            let rows = stmt.query_map(params![semester], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        for id in &ids {
            cascade_step(
                "credential",
                tx.execute(
                    "DELETE FROM users WHERE id=?1 AND role='student'",
                    params![id],
                )
                .map_err(StoreError::from),
            )?;
        }
        let deleted = cascade_step(
            "students",
            tx.execute(
                "DELETE FROM students WHERE current_semester=?1",
                params![semester],
            )
            .map_err(StoreError::from),
        )?;

        tx.commit()?;
        Ok(deleted)
    }
}

fn map_student_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudentRow> {
    Ok(StudentRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        batch: row.get(3)?,
        joined_year: row.get(4)?,
        current_semester: row.get(5)?,
        feedback_given: row.get::<_, i64>(6)? != 0,
    })
}

fn student_row_tx(tx: &Transaction<'_>, id: &str) -> Result<Option<StudentRow>, StoreError> {
    Ok(tx
        .query_row(
            "SELECT id, name, email, batch, joined_year, current_semester, feedback_given \
             FROM students WHERE id=?1",
            params![id],
            map_student_row,
        )
        .optional()?)
}
