#![forbid(unsafe_code)]

use super::ImportOutcome;
use crate::{Caller, Portal, PortalError, require_role};
use dp_core::Role;
use dp_storage::{FacultyCascade, FacultyRow, FacultyUpdate, NewFaculty, StoreError};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FacultyView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl From<FacultyRow> for FacultyView {
    fn from(row: FacultyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            designation: row.designation,
        }
    }
}

/// Counts of dependent records removed alongside a faculty member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FacultyCascadeView {
    pub feedback_deleted: usize,
    pub course_assignments_deleted: usize,
    pub elective_assignments_deleted: usize,
}

impl From<FacultyCascade> for FacultyCascadeView {
    fn from(cascade: FacultyCascade) -> Self {
        Self {
            feedback_deleted: cascade.feedback_deleted,
            course_assignments_deleted: cascade.course_assignments_deleted,
            elective_assignments_deleted: cascade.elective_assignments_deleted,
        }
    }
}

impl Portal {
    pub fn list_faculty(&self) -> Result<Vec<FacultyView>, PortalError> {
        Ok(self
            .store
            .list_faculty()?
            .into_iter()
            .map(FacultyView::from)
            .collect())
    }

    pub fn get_faculty(&self, id: &str) -> Result<FacultyView, PortalError> {
        let Some(faculty) = self.store.get_faculty(id)? else {
            return Err(PortalError::NotFound("faculty"));
        };
        Ok(faculty.into())
    }

    pub fn update_faculty(
        &mut self,
        caller: &Caller,
        id: &str,
        update: FacultyUpdate,
    ) -> Result<FacultyView, PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.update_faculty(id, update) {
            Ok(row) => Ok(row.into()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("faculty")),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes a faculty member together with their credential, feedback,
    /// and every course and elective assignment, atomically.
    pub fn delete_faculty(
        &mut self,
        caller: &Caller,
        id: &str,
    ) -> Result<FacultyCascadeView, PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.delete_faculty(id) {
            Ok(cascade) => Ok(cascade.into()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("faculty")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn import_faculty(
        &mut self,
        caller: &Caller,
        records: Vec<NewFaculty>,
    ) -> Result<ImportOutcome, PortalError> {
        require_role(caller, Role::Admin)?;

        let mut outcome = ImportOutcome::default();
        for record in records {
            match self.store.insert_faculty(record) {
                Ok(_) => outcome.inserted += 1,
                Err(StoreError::Duplicate(_)) => outcome.skipped += 1,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(outcome)
    }
}
