#![forbid(unsafe_code)]

use super::ImportOutcome;
use crate::{Caller, Portal, PortalError, require_role};
use dp_core::{Role, semester_in_range};
use dp_storage::{CourseRow, CourseUpdate, NewCourse, StoreError};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CourseView {
    pub code: String,
    pub name: String,
    pub semester: i64,
}

impl From<CourseRow> for CourseView {
    fn from(row: CourseRow) -> Self {
        Self {
            code: row.code,
            name: row.name,
            semester: row.semester,
        }
    }
}

/// Counts removed by the course cascade: the course rows themselves plus
/// the faculty assignments that referenced them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CourseCascadeView {
    pub courses_deleted: usize,
    pub assignments_deleted: usize,
}

impl Portal {
    pub fn list_courses(&self, caller: &Caller) -> Result<Vec<CourseView>, PortalError> {
        require_role(caller, Role::Admin)?;
        Ok(self
            .store
            .list_courses()?
            .into_iter()
            .map(CourseView::from)
            .collect())
    }

    pub fn courses_by_semester(&self, semester: i64) -> Result<Vec<CourseView>, PortalError> {
        Ok(self
            .store
            .courses_by_semester(semester)?
            .into_iter()
            .map(CourseView::from)
            .collect())
    }

    pub fn get_course(&self, code: &str) -> Result<CourseView, PortalError> {
        let Some(course) = self.store.get_course(code)? else {
            return Err(PortalError::NotFound("course"));
        };
        Ok(course.into())
    }

    pub fn update_course(
        &mut self,
        caller: &Caller,
        code: &str,
        update: CourseUpdate,
    ) -> Result<CourseView, PortalError> {
        require_role(caller, Role::Admin)?;
        if let Some(semester) = update.semester {
            if !semester_in_range(semester) {
                return Err(PortalError::Validation("semester must be between 1 and 8"));
            }
        }
        match self.store.update_course(code, update) {
            Ok(row) => Ok(row.into()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("course")),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes a course and every faculty assignment pointing at it,
    /// atomically. Returns how many assignments went with it.
    pub fn delete_course(&mut self, caller: &Caller, code: &str) -> Result<usize, PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.delete_course(code) {
            Ok(assignments) => Ok(assignments),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("course")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn delete_courses_by_semester(
        &mut self,
        caller: &Caller,
        semester: i64,
    ) -> Result<CourseCascadeView, PortalError> {
        require_role(caller, Role::Admin)?;
        if !semester_in_range(semester) {
            return Err(PortalError::Validation("semester must be between 1 and 8"));
        }
        let (courses_deleted, assignments_deleted) =
            self.store.delete_courses_by_semester(semester)?;
        Ok(CourseCascadeView {
            courses_deleted,
            assignments_deleted,
        })
    }

    pub fn import_courses(
        &mut self,
        caller: &Caller,
        records: Vec<NewCourse>,
    ) -> Result<ImportOutcome, PortalError> {
        require_role(caller, Role::Admin)?;

        let mut outcome = ImportOutcome::default();
        for record in records {
            if !semester_in_range(record.semester) {
                return Err(PortalError::Validation("semester must be between 1 and 8"));
            }
            match self.store.insert_course(record) {
                Ok(_) => outcome.inserted += 1,
                Err(StoreError::Duplicate(_)) => outcome.skipped += 1,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(outcome)
    }
}
