#![forbid(unsafe_code)]

use super::ImportOutcome;
use crate::{Caller, Portal, PortalError, require_role, require_roles, require_self_or_admin};
use dp_core::{Role, elective_batch_in_range};
use dp_storage::{ElectiveCascade, ElectiveChoice, ElectiveCourseRow, NewElectiveCourse, StoreError};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElectiveCourseView {
    pub code: String,
    pub name: String,
    pub semester: i64,
}

impl From<ElectiveCourseRow> for ElectiveCourseView {
    fn from(row: ElectiveCourseRow) -> Self {
        Self {
            code: row.code,
            name: row.name,
            semester: row.semester,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ElectiveCascadeView {
    pub faculty_assignments_deleted: usize,
    pub student_choices_pulled: usize,
}

impl From<ElectiveCascade> for ElectiveCascadeView {
    fn from(cascade: ElectiveCascade) -> Self {
        Self {
            faculty_assignments_deleted: cascade.faculty_assignments_deleted,
            student_choices_pulled: cascade.student_choices_pulled,
        }
    }
}

/// One (elective, batch) pair a student is enrolled in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElectiveChoiceView {
    pub elective_code: String,
    pub batch: i64,
}

impl From<ElectiveChoice> for ElectiveChoiceView {
    fn from(choice: ElectiveChoice) -> Self {
        Self {
            elective_code: choice.elective_code,
            batch: choice.batch,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StudentElectivesView {
    pub student_id: String,
    pub electives: Vec<ElectiveChoiceView>,
}

/// One row of a bulk elective-enrolment request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElectiveEnrolment {
    pub student_id: String,
    pub elective_code: String,
    pub batch: i64,
}

impl Portal {
    pub fn list_elective_courses(&self) -> Result<Vec<ElectiveCourseView>, PortalError> {
        Ok(self
            .store
            .list_elective_courses()?
            .into_iter()
            .map(ElectiveCourseView::from)
            .collect())
    }

    pub fn get_elective_course(&self, code: &str) -> Result<ElectiveCourseView, PortalError> {
        let Some(course) = self.store.get_elective_course(code)? else {
            return Err(PortalError::NotFound("elective course"));
        };
        Ok(course.into())
    }

    pub fn import_elective_courses(
        &mut self,
        caller: &Caller,
        records: Vec<NewElectiveCourse>,
    ) -> Result<ImportOutcome, PortalError> {
        require_role(caller, Role::Admin)?;

        let mut outcome = ImportOutcome::default();
        for record in records {
            match self.store.insert_elective_course(record) {
                Ok(_) => outcome.inserted += 1,
                Err(StoreError::Duplicate(_)) => outcome.skipped += 1,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(outcome)
    }

    /// Removes an elective course, its faculty assignments, and every
    /// occurrence of it in student elective lists, atomically.
    pub fn delete_elective_course(
        &mut self,
        caller: &Caller,
        code: &str,
    ) -> Result<ElectiveCascadeView, PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.delete_elective_course(code) {
            Ok(cascade) => Ok(cascade.into()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("elective course")),
            Err(err) => Err(err.into()),
        }
    }

    /// Bulk enrolment with add-to-set semantics: pairs already present, and
    /// rows with a batch outside 1..=5, are skipped. An unknown elective
    /// code fails the whole request.
    pub fn assign_electives(
        &mut self,
        caller: &Caller,
        enrolments: Vec<ElectiveEnrolment>,
    ) -> Result<ImportOutcome, PortalError> {
        require_role(caller, Role::Admin)?;

        let mut outcome = ImportOutcome::default();
        for enrolment in enrolments {
            if !elective_batch_in_range(enrolment.batch) {
                outcome.skipped += 1;
                continue;
            }
            if self
                .store
                .get_elective_course(&enrolment.elective_code)?
                .is_none()
            {
                return Err(PortalError::NotFound("elective course"));
            }
            let changed = self.store.add_elective_choice(
                &enrolment.student_id,
                &enrolment.elective_code,
                enrolment.batch,
            )?;
            if changed {
                outcome.inserted += 1;
            } else {
                outcome.skipped += 1;
            }
        }
        Ok(outcome)
    }

    pub fn list_student_electives(
        &self,
        caller: &Caller,
    ) -> Result<Vec<StudentElectivesView>, PortalError> {
        require_role(caller, Role::Admin)?;
        Ok(self
            .store
            .list_elective_choices()?
            .into_iter()
            .map(|row| StudentElectivesView {
                student_id: row.student_id,
                electives: row
                    .electives
                    .into_iter()
                    .map(ElectiveChoiceView::from)
                    .collect(),
            })
            .collect())
    }

    pub fn electives_for_student(
        &self,
        caller: &Caller,
        student_id: &str,
    ) -> Result<Vec<ElectiveChoiceView>, PortalError> {
        require_roles(caller, &[Role::Student, Role::Admin])?;
        require_self_or_admin(caller, student_id)?;
        Ok(self
            .store
            .elective_choices_for_student(student_id)?
            .into_iter()
            .map(ElectiveChoiceView::from)
            .collect())
    }

    pub fn update_student_elective(
        &mut self,
        caller: &Caller,
        student_id: &str,
        elective_code: &str,
        new_batch: Option<i64>,
        new_elective_code: Option<String>,
    ) -> Result<(), PortalError> {
        require_role(caller, Role::Admin)?;
        if let Some(batch) = new_batch {
            if !elective_batch_in_range(batch) {
                return Err(PortalError::Validation("batch must be between 1 and 5"));
            }
        }
        match self
            .store
            .update_elective_choice(student_id, elective_code, new_batch, new_elective_code)
        {
            Ok(()) => Ok(()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("elective enrolment")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn remove_student_elective(
        &mut self,
        caller: &Caller,
        student_id: &str,
        elective_code: &str,
    ) -> Result<(), PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.remove_elective_choice(student_id, elective_code) {
            Ok(()) => Ok(()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("elective enrolment")),
            Err(err) => Err(err.into()),
        }
    }
}
