#![forbid(unsafe_code)]

use super::notifications::NotificationView;
use crate::{
    Caller, Portal, PortalError, now_ms, require_role, require_roles, require_self_or_admin,
};
use dp_core::grievance::resolution_message;
use dp_core::{GrievanceStatus, Role, semester_in_range};
use dp_storage::{GrievanceRow, GrievanceStats, NewGrievance};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitGrievance {
    pub student_id: String,
    pub faculty_id: Option<String>,
    pub course_code: Option<String>,
    pub batch: String,
    pub semester: i64,
    pub category: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GrievanceView {
    pub id: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    pub batch: String,
    pub semester: i64,
    pub category: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_response: Option<String>,
    pub created_at_ms: i64,
}

impl From<GrievanceRow> for GrievanceView {
    fn from(row: GrievanceRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            faculty_id: row.faculty_id,
            course_code: row.course_code,
            batch: row.batch,
            semester: row.semester,
            category: row.category,
            subject: row.subject,
            body: row.body,
            status: row.status,
            admin_response: row.admin_response,
            created_at_ms: row.created_at_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GrievanceStatsView {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub rejected: usize,
}

impl From<GrievanceStats> for GrievanceStatsView {
    fn from(stats: GrievanceStats) -> Self {
        Self {
            total: stats.total,
            pending: stats.pending,
            in_progress: stats.in_progress,
            resolved: stats.resolved,
            rejected: stats.rejected,
        }
    }
}

/// What a status update produced. A non-terminal status keeps the grievance
/// and returns it updated; a terminal one deletes it and hands back the
/// notification that replaced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrievanceOutcome {
    Updated(GrievanceView),
    Closed(NotificationView),
}

impl Portal {
    pub fn submit_grievance(
        &mut self,
        caller: &Caller,
        request: SubmitGrievance,
    ) -> Result<GrievanceView, PortalError> {
        self.submit_grievance_at(caller, request, now_ms())
    }

    pub fn submit_grievance_at(
        &mut self,
        caller: &Caller,
        request: SubmitGrievance,
        created_at_ms: i64,
    ) -> Result<GrievanceView, PortalError> {
        require_role(caller, Role::Student)?;
        require_self_or_admin(caller, &request.student_id)?;
        if !semester_in_range(request.semester) {
            return Err(PortalError::Validation("semester must be between 1 and 8"));
        }
        if request.subject.trim().is_empty() {
            return Err(PortalError::Validation("subject is required"));
        }
        if request.body.trim().is_empty() {
            return Err(PortalError::Validation("description is required"));
        }

        let row = self.store.insert_grievance(NewGrievance {
            student_id: request.student_id,
            faculty_id: request.faculty_id,
            course_code: request.course_code,
            batch: request.batch,
            semester: request.semester,
            category: request.category,
            subject: request.subject,
            body: request.body,
            created_at_ms,
        })?;
        Ok(row.into())
    }

    pub fn list_grievances(&self, caller: &Caller) -> Result<Vec<GrievanceView>, PortalError> {
        require_role(caller, Role::Admin)?;
        Ok(self
            .store
            .list_grievances()?
            .into_iter()
            .map(GrievanceView::from)
            .collect())
    }

    pub fn grievances_by_student(
        &self,
        caller: &Caller,
        student_id: &str,
    ) -> Result<Vec<GrievanceView>, PortalError> {
        require_roles(caller, &[Role::Student, Role::Admin])?;
        require_self_or_admin(caller, student_id)?;
        Ok(self
            .store
            .grievances_by_student(student_id)?
            .into_iter()
            .map(GrievanceView::from)
            .collect())
    }

    pub fn get_grievance(&self, caller: &Caller, id: &str) -> Result<GrievanceView, PortalError> {
        require_role(caller, Role::Admin)?;
        let Some(row) = self.store.get_grievance(id)? else {
            return Err(PortalError::NotFound("grievance"));
        };
        Ok(row.into())
    }

    /// Status transition. A terminal status requires a non-empty response,
    /// notifies the student, and removes the grievance in one transaction.
    pub fn update_grievance(
        &mut self,
        caller: &Caller,
        id: &str,
        status: GrievanceStatus,
        admin_response: Option<String>,
    ) -> Result<GrievanceOutcome, PortalError> {
        self.update_grievance_at(caller, id, status, admin_response, now_ms())
    }

    pub fn update_grievance_at(
        &mut self,
        caller: &Caller,
        id: &str,
        status: GrievanceStatus,
        admin_response: Option<String>,
        now_ms: i64,
    ) -> Result<GrievanceOutcome, PortalError> {
        require_role(caller, Role::Admin)?;

        if !status.is_terminal() {
            let row = self.store.update_grievance_status(id, status, admin_response)?;
            return Ok(GrievanceOutcome::Updated(row.into()));
        }

        let response = admin_response.unwrap_or_default();
        if response.trim().is_empty() {
            return Err(PortalError::Validation(
                "a response is required to resolve or reject",
            ));
        }
        let Some(grievance) = self.store.get_grievance(id)? else {
            return Err(PortalError::NotFound("grievance"));
        };

        let message = resolution_message(&grievance.subject, status, &response);
        let notification = self.store.close_grievance(id, &message, now_ms)?;
        Ok(GrievanceOutcome::Closed(notification.into()))
    }

    pub fn delete_grievance(&mut self, caller: &Caller, id: &str) -> Result<(), PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.delete_grievance(id) {
            Ok(()) => Ok(()),
            Err(dp_storage::StoreError::UnknownId) => Err(PortalError::NotFound("grievance")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn grievance_stats(&self, caller: &Caller) -> Result<GrievanceStatsView, PortalError> {
        require_role(caller, Role::Admin)?;
        Ok(self.store.grievance_status_counts()?.into())
    }
}
