#![forbid(unsafe_code)]

use super::{NotificationRow, SqliteStore, StoreError};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    pub fn notifications_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<NotificationRow>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT id, student_id, grievance_id, message, is_read, created_at_ms \
             FROM notifications WHERE student_id=?1 ORDER BY created_at_ms DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![student_id], map_notification_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn mark_notification_read(&mut self, id: &str) -> Result<NotificationRow, StoreError> {
        let updated = self
            .conn_mut()
            .execute("UPDATE notifications SET is_read=1 WHERE id=?1", params![id])?;
        if updated == 0 {
            return Err(StoreError::UnknownId);
        }
        self.conn()
            .query_row(
                "SELECT id, student_id, grievance_id, message, is_read, created_at_ms \
                 FROM notifications WHERE id=?1",
                params![id],
                map_notification_row,
            )
            .optional()?
            .ok_or(StoreError::UnknownId)
    }

    pub fn mark_all_notifications_read(&mut self, student_id: &str) -> Result<usize, StoreError> {
        Ok(self.conn_mut().execute(
            "UPDATE notifications SET is_read=1 WHERE student_id=?1 AND is_read=0",
            params![student_id],
        )?)
    }

    pub fn delete_notification(&mut self, id: &str) -> Result<(), StoreError> {
        let deleted = self
            .conn_mut()
            .execute("DELETE FROM notifications WHERE id=?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }
}

fn map_notification_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotificationRow> {
    Ok(NotificationRow {
        id: row.get(0)?,
        student_id: row.get(1)?,
        grievance_id: row.get(2)?,
        message: row.get(3)?,
        is_read: row.get::<_, i64>(4)? != 0,
        created_at_ms: row.get(5)?,
    })
}
