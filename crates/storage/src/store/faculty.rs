#![forbid(unsafe_code)]

use super::{
    FacultyCascade, FacultyRow, FacultyUpdate, NewFaculty, SqliteStore, StoreError, canonical_id,
    cascade_step, map_insert_conflict,
};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    pub fn insert_faculty(&mut self, request: NewFaculty) -> Result<FacultyRow, StoreError> {
        let id = canonical_id(&request.id, "invalid faculty id")?;
        let insert = self.conn_mut().execute(
            "INSERT INTO faculty(id, name, designation) VALUES (?1, ?2, ?3)",
            params![id, request.name, request.designation],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, "faculty"));
        }
        Ok(FacultyRow {
            id,
            name: request.name,
            designation: request.designation,
        })
    }

    pub fn get_faculty(&self, id: &str) -> Result<Option<FacultyRow>, StoreError> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, name, designation FROM faculty WHERE id=?1",
                params![id],
                map_faculty_row,
            )
            .optional()?)
    }

    pub fn list_faculty(&self) -> Result<Vec<FacultyRow>, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, designation FROM faculty ORDER BY id ASC")?;
        let rows = stmt.query_map([], map_faculty_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn update_faculty(
        &mut self,
        id: &str,
        update: FacultyUpdate,
    ) -> Result<FacultyRow, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let current = tx
            .query_row(
                "SELECT id, name, designation FROM faculty WHERE id=?1",
                params![id],
                map_faculty_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Err(StoreError::UnknownId);
        };

        let next = FacultyRow {
            id: current.id,
            name: update.name.unwrap_or(current.name),
            designation: update.designation.or(current.designation),
        };

        tx.execute(
            "UPDATE faculty SET name=?2, designation=?3 WHERE id=?1",
            params![next.id, next.name, next.designation],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Full faculty cascade inside one transaction: credential, feedback,
    /// course assignments, elective assignments, and only then the faculty
    /// row itself, so dependent queries keyed by faculty id still resolve
    /// during cleanup.
    pub fn delete_faculty(&mut self, id: &str) -> Result<FacultyCascade, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let exists = tx
            .query_row("SELECT 1 FROM faculty WHERE id=?1", params![id], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::UnknownId);
        }

        cascade_step(
            "credential",
            tx.execute(
                "DELETE FROM users WHERE id=?1 AND role='faculty'",
                params![id],
            )
            .map_err(StoreError::from),
        )?;
        let feedback_deleted = cascade_step(
            "feedback",
            tx.execute("DELETE FROM feedback WHERE faculty_id=?1", params![id])
                .map_err(StoreError::from),
        )?;
        let course_assignments_deleted = cascade_step(
            "course assignments",
            tx.execute(
                "DELETE FROM course_faculty_assignments WHERE faculty_id=?1",
                params![id],
            )
            .map_err(StoreError::from),
        )?;
        let elective_assignments_deleted = cascade_step(
            "elective assignments",
            tx.execute(
                "DELETE FROM elective_faculty_assignments WHERE faculty_id=?1",
                params![id],
            )
            .map_err(StoreError::from),
        )?;
        cascade_step(
            "faculty",
            tx.execute("DELETE FROM faculty WHERE id=?1", params![id])
                .map_err(StoreError::from),
        )?;

        tx.commit()?;
        Ok(FacultyCascade {
            feedback_deleted,
            course_assignments_deleted,
            elective_assignments_deleted,
        })
    }
}

fn map_faculty_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FacultyRow> {
    Ok(FacultyRow {
        id: row.get(0)?,
        name: row.get(1)?,
        designation: row.get(2)?,
    })
}
