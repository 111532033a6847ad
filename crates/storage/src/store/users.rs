#![forbid(unsafe_code)]

use super::{NewUser, SqliteStore, StoreError, UserRow, canonical_id};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// Idempotent insert used by account provisioning; returns whether a
    /// fresh credential record was created.
    pub fn ensure_user(&mut self, request: NewUser) -> Result<bool, StoreError> {
        let id = canonical_id(&request.id, "invalid user id")?;
        let inserted = self.conn_mut().execute(
            "INSERT OR IGNORE INTO users(id, role, name, password, email) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                request.role,
                request.name,
                request.password,
                request.email
            ],
        )?;
        Ok(inserted > 0)
    }

    pub fn get_user(&self, id: &str, role: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, role, name, password, email FROM users WHERE id=?1 AND role=?2",
                params![id, role],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        role: row.get(1)?,
                        name: row.get(2)?,
                        password: row.get(3)?,
                        email: row.get(4)?,
                    })
                },
            )
            .optional()?)
    }
}
