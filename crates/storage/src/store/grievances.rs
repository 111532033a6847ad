#![forbid(unsafe_code)]

use super::{
    GrievanceRow, GrievanceStats, NewGrievance, NotificationRow, SqliteStore, StoreError,
    canonical_id, cascade_step, next_counter_tx,
};
use dp_core::GrievanceStatus;
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    pub fn insert_grievance(&mut self, request: NewGrievance) -> Result<GrievanceRow, StoreError> {
        let student_id = canonical_id(&request.student_id, "invalid student id")?;

        let tx = self.conn_mut().transaction()?;
        let seq = next_counter_tx(&tx, "grievance_seq")?;
        let id = format!("GRV-{seq:04}");

        let row = GrievanceRow {
            id,
            student_id,
            faculty_id: request.faculty_id,
            course_code: request.course_code,
            batch: request.batch,
            semester: request.semester,
            category: request.category,
            subject: request.subject,
            body: request.body,
            status: GrievanceStatus::Pending.as_str().to_string(),
            admin_response: None,
            created_at_ms: request.created_at_ms,
        };

        tx.execute(
            "INSERT INTO grievances(id, student_id, faculty_id, course_code, batch, semester, \
             category, subject, body, status, admin_response, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                row.id,
                row.student_id,
                row.faculty_id,
                row.course_code,
                row.batch,
                row.semester,
                row.category,
                row.subject,
                row.body,
                row.status,
                row.admin_response,
                row.created_at_ms
            ],
        )?;

        tx.commit()?;
        Ok(row)
    }

    pub fn get_grievance(&self, id: &str) -> Result<Option<GrievanceRow>, StoreError> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, student_id, faculty_id, course_code, batch, semester, category, \
                 subject, body, status, admin_response, created_at_ms \
                 FROM grievances WHERE id=?1",
                params![id],
                map_grievance_row,
            )
            .optional()?)
    }

    pub fn list_grievances(&self) -> Result<Vec<GrievanceRow>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT id, student_id, faculty_id, course_code, batch, semester, category, \
             subject, body, status, admin_response, created_at_ms \
             FROM grievances ORDER BY created_at_ms DESC, id DESC",
        )?;
        let rows = stmt.query_map([], map_grievance_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn grievances_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<GrievanceRow>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT id, student_id, faculty_id, course_code, batch, semester, category, \
             subject, body, status, admin_response, created_at_ms \
             FROM grievances WHERE student_id=?1 ORDER BY created_at_ms DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![student_id], map_grievance_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Non-terminal status update: persists the status and the optional
    /// admin response, nothing else.
    pub fn update_grievance_status(
        &mut self,
        id: &str,
        status: GrievanceStatus,
        admin_response: Option<String>,
    ) -> Result<GrievanceRow, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let updated = tx.execute(
            "UPDATE grievances SET status=?2, admin_response=?3 WHERE id=?1",
            params![id, status.as_str(), admin_response],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownId);
        }

        let row = tx
            .query_row(
                "SELECT id, student_id, faculty_id, course_code, batch, semester, category, \
                 subject, body, status, admin_response, created_at_ms \
                 FROM grievances WHERE id=?1",
                params![id],
                map_grievance_row,
            )
            .optional()?
            .ok_or(StoreError::UnknownId)?;

        tx.commit()?;
        Ok(row)
    }

    /// Terminal transition: one transaction creates the student notification
    /// and deletes the grievance row. The grievance's identity survives only
    /// inside the notification.
    pub fn close_grievance(
        &mut self,
        id: &str,
        message: &str,
        now_ms: i64,
    ) -> Result<NotificationRow, StoreError> {
        let tx = self.conn_mut().transaction()?;

        let grievance = tx
            .query_row(
                "SELECT id, student_id, faculty_id, course_code, batch, semester, category, \
                 subject, body, status, admin_response, created_at_ms \
                 FROM grievances WHERE id=?1",
                params![id],
                map_grievance_row,
            )
            .optional()?;
        let Some(grievance) = grievance else {
            return Err(StoreError::UnknownId);
        };

        let seq = next_counter_tx(&tx, "notification_seq")?;
        let notification = NotificationRow {
            id: format!("NTF-{seq:04}"),
            student_id: grievance.student_id,
            grievance_id: grievance.id,
            message: message.to_string(),
            is_read: false,
            created_at_ms: now_ms,
        };

        cascade_step(
            "notification",
            tx.execute(
                "INSERT INTO notifications(id, student_id, grievance_id, message, is_read, \
                 created_at_ms) VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                params![
                    notification.id,
                    notification.student_id,
                    notification.grievance_id,
                    notification.message,
                    notification.created_at_ms
                ],
            )
            .map_err(StoreError::from),
        )?;
        cascade_step(
            "grievance",
            tx.execute("DELETE FROM grievances WHERE id=?1", params![id])
                .map_err(StoreError::from),
        )?;

        tx.commit()?;
        Ok(notification)
    }

    pub fn delete_grievance(&mut self, id: &str) -> Result<(), StoreError> {
        let deleted = self
            .conn_mut()
            .execute("DELETE FROM grievances WHERE id=?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    pub fn grievance_status_counts(&self) -> Result<GrievanceStats, StoreError> {
        let mut stats = GrievanceStats::default();
        let mut stmt = self
            .conn()
            .prepare("SELECT status, COUNT(1) FROM grievances GROUP BY status")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let status: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            let count = usize::try_from(count).unwrap_or(0);
            stats.total += count;
            match GrievanceStatus::parse(&status) {
                Some(GrievanceStatus::Pending) => stats.pending += count,
                Some(GrievanceStatus::InProgress) => stats.in_progress += count,
                Some(GrievanceStatus::Resolved) => stats.resolved += count,
                Some(GrievanceStatus::Rejected) => stats.rejected += count,
                None => {}
            }
        }
        Ok(stats)
    }
}

fn map_grievance_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GrievanceRow> {
    Ok(GrievanceRow {
        id: row.get(0)?,
        student_id: row.get(1)?,
        faculty_id: row.get(2)?,
        course_code: row.get(3)?,
        batch: row.get(4)?,
        semester: row.get(5)?,
        category: row.get(6)?,
        subject: row.get(7)?,
        body: row.get(8)?,
        status: row.get(9)?,
        admin_response: row.get(10)?,
        created_at_ms: row.get(11)?,
    })
}
