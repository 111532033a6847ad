#![forbid(unsafe_code)]

use super::ImportOutcome;
use super::sessions::imported_student_password;
use crate::{Caller, Portal, PortalError, require_role, require_roles, require_self_or_admin};
use dp_core::{Role, semester, semester_in_range};
use dp_storage::{NewStudent, NewUser, StoreError, StudentRow, StudentUpdate};
use serde::Serialize;
use time::Date;

/// One validated roster row handed over by the CSV collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub batch: String,
    pub joined_year: i64,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StudentView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub batch: String,
    pub joined_year: i64,
    pub current_semester: i64,
    pub feedback_given: bool,
}

impl From<StudentRow> for StudentView {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            batch: row.batch,
            joined_year: row.joined_year,
            current_semester: row.current_semester,
            feedback_given: row.feedback_given,
        }
    }
}

impl Portal {
    pub fn list_students(&self, caller: &Caller) -> Result<Vec<StudentView>, PortalError> {
        require_role(caller, Role::Admin)?;
        Ok(self
            .store
            .list_students()?
            .into_iter()
            .map(StudentView::from)
            .collect())
    }

    pub fn get_student(&self, caller: &Caller, id: &str) -> Result<StudentView, PortalError> {
        require_roles(caller, &[Role::Student, Role::Admin])?;
        require_self_or_admin(caller, id)?;
        let Some(student) = self.store.get_student(id)? else {
            return Err(PortalError::NotFound("student"));
        };
        Ok(student.into())
    }

    pub fn update_student(
        &mut self,
        caller: &Caller,
        id: &str,
        update: StudentUpdate,
    ) -> Result<StudentView, PortalError> {
        require_roles(caller, &[Role::Student, Role::Admin])?;
        require_self_or_admin(caller, id)?;
        if let Some(semester) = update.current_semester {
            if !semester_in_range(semester) {
                return Err(PortalError::Validation("semester must be between 1 and 8"));
            }
        }
        match self.store.update_student(id, update) {
            Ok(row) => Ok(row.into()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("student")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn delete_student(&mut self, caller: &Caller, id: &str) -> Result<(), PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.delete_student(id) {
            Ok(()) => Ok(()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("student")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn delete_students_by_semester(
        &mut self,
        caller: &Caller,
        semester: i64,
    ) -> Result<usize, PortalError> {
        require_role(caller, Role::Admin)?;
        if !semester_in_range(semester) {
            return Err(PortalError::Validation("semester must be between 1 and 8"));
        }
        Ok(self.store.delete_students_by_semester(semester)?)
    }

    pub fn import_students(
        &mut self,
        caller: &Caller,
        records: Vec<StudentRecord>,
        today: Date,
    ) -> Result<ImportOutcome, PortalError> {
        require_role(caller, Role::Admin)?;

        let mut outcome = ImportOutcome::default();
        for record in records {
            let current_semester = semester::semester_for(
                record.joined_year,
                i64::from(today.year()),
                u8::from(today.month()),
            );
            let inserted = self.store.insert_student(NewStudent {
                id: record.id.clone(),
                name: record.name.clone(),
                email: record.email.clone(),
                batch: record.batch,
                joined_year: record.joined_year,
                current_semester,
            });
            match inserted {
                Ok(student) => {
                    self.store.ensure_user(NewUser {
                        id: student.id.clone(),
                        role: Role::Student.as_str().to_string(),
                        name: student.name.clone(),
                        password: imported_student_password(&student.name, &student.id),
                        email: student.email,
                    })?;
                    outcome.inserted += 1;
                }
                Err(StoreError::Duplicate(_)) => outcome.skipped += 1,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(outcome)
    }
}
