#![forbid(unsafe_code)]

use crate::{Caller, Portal, PortalError, require_roles, require_self_or_admin};
use dp_core::Role;
use dp_storage::{NotificationRow, StoreError};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    pub id: String,
    pub student_id: String,
    pub grievance_id: String,
    pub message: String,
    pub is_read: bool,
    pub created_at_ms: i64,
}

impl From<NotificationRow> for NotificationView {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            grievance_id: row.grievance_id,
            message: row.message,
            is_read: row.is_read,
            created_at_ms: row.created_at_ms,
        }
    }
}

impl Portal {
    pub fn notifications_for_student(
        &self,
        caller: &Caller,
        student_id: &str,
    ) -> Result<Vec<NotificationView>, PortalError> {
        require_roles(caller, &[Role::Student, Role::Admin])?;
        require_self_or_admin(caller, student_id)?;
        Ok(self
            .store
            .notifications_for_student(student_id)?
            .into_iter()
            .map(NotificationView::from)
            .collect())
    }

    pub fn mark_notification_read(&mut self, id: &str) -> Result<NotificationView, PortalError> {
        match self.store.mark_notification_read(id) {
            Ok(row) => Ok(row.into()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("notification")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn mark_all_notifications_read(
        &mut self,
        caller: &Caller,
        student_id: &str,
    ) -> Result<usize, PortalError> {
        require_roles(caller, &[Role::Student, Role::Admin])?;
        require_self_or_admin(caller, student_id)?;
        Ok(self.store.mark_all_notifications_read(student_id)?)
    }

    pub fn delete_notification(&mut self, id: &str) -> Result<(), PortalError> {
        match self.store.delete_notification(id) {
            Ok(()) => Ok(()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("notification")),
            Err(err) => Err(err.into()),
        }
    }
}
