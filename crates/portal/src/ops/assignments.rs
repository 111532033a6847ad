#![forbid(unsafe_code)]

use crate::{Caller, Portal, PortalError, require_role};
use dp_core::{Role, elective_batch_in_range, semester_in_range};
use dp_storage::{
    CourseAssignmentRow, ElectiveAssignmentRow, NewCourseAssignment, NewElectiveAssignment,
    StoreError,
};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CourseAssignmentView {
    pub id: i64,
    pub course_code: String,
    pub faculty_id: String,
    pub semester: i64,
    pub batch: String,
}

impl From<CourseAssignmentRow> for CourseAssignmentView {
    fn from(row: CourseAssignmentRow) -> Self {
        Self {
            id: row.id,
            course_code: row.course_code,
            faculty_id: row.faculty_id,
            semester: row.semester,
            batch: row.batch,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElectiveAssignmentView {
    pub id: i64,
    pub elective_code: String,
    pub faculty_id: String,
    pub batch: i64,
}

impl From<ElectiveAssignmentRow> for ElectiveAssignmentView {
    fn from(row: ElectiveAssignmentRow) -> Self {
        Self {
            id: row.id,
            elective_code: row.elective_code,
            faculty_id: row.faculty_id,
            batch: row.batch,
        }
    }
}

/// One course a faculty member teaches, with every batch they take it for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FacultyCourseLoad {
    pub course_code: String,
    pub semester: i64,
    pub batches: Vec<String>,
}

impl Portal {
    pub fn assign_course_faculty(
        &mut self,
        caller: &Caller,
        request: NewCourseAssignment,
    ) -> Result<CourseAssignmentView, PortalError> {
        require_role(caller, Role::Admin)?;
        if !semester_in_range(request.semester) {
            return Err(PortalError::Validation("semester must be between 1 and 8"));
        }
        Ok(self.store.assign_course_faculty(request)?.into())
    }

    pub fn update_course_assignment(
        &mut self,
        caller: &Caller,
        id: i64,
        request: NewCourseAssignment,
    ) -> Result<CourseAssignmentView, PortalError> {
        require_role(caller, Role::Admin)?;
        if !semester_in_range(request.semester) {
            return Err(PortalError::Validation("semester must be between 1 and 8"));
        }
        match self.store.update_course_assignment(id, request) {
            Ok(row) => Ok(row.into()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("assignment")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn list_course_assignments(&self) -> Result<Vec<CourseAssignmentView>, PortalError> {
        Ok(self
            .store
            .list_course_assignments()?
            .into_iter()
            .map(CourseAssignmentView::from)
            .collect())
    }

    pub fn course_assignments_by_semester_batch(
        &self,
        semester: i64,
        batch: &str,
    ) -> Result<Vec<CourseAssignmentView>, PortalError> {
        Ok(self
            .store
            .course_assignments_by_semester_batch(semester, batch)?
            .into_iter()
            .map(CourseAssignmentView::from)
            .collect())
    }

    pub fn course_assignments_by_faculty(
        &self,
        faculty_id: &str,
    ) -> Result<Vec<CourseAssignmentView>, PortalError> {
        Ok(self
            .store
            .course_assignments_by_faculty(faculty_id)?
            .into_iter()
            .map(CourseAssignmentView::from)
            .collect())
    }

    /// Teaching load grouped per course, with the batch list deduplicated
    /// in first-seen order.
    pub fn faculty_course_batches(
        &self,
        faculty_id: &str,
    ) -> Result<Vec<FacultyCourseLoad>, PortalError> {
        let mut loads: Vec<FacultyCourseLoad> = Vec::new();
        for row in self.store.course_assignments_by_faculty(faculty_id)? {
            match loads
                .iter_mut()
                .find(|load| load.course_code == row.course_code)
            {
                Some(load) => {
                    if !load.batches.contains(&row.batch) {
                        load.batches.push(row.batch);
                    }
                }
                None => loads.push(FacultyCourseLoad {
                    course_code: row.course_code,
                    semester: row.semester,
                    batches: vec![row.batch],
                }),
            }
        }
        Ok(loads)
    }

    pub fn delete_course_assignment(
        &mut self,
        caller: &Caller,
        id: i64,
    ) -> Result<(), PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.delete_course_assignment(id) {
            Ok(()) => Ok(()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("assignment")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn delete_assignments_by_course(
        &mut self,
        caller: &Caller,
        course_code: &str,
    ) -> Result<usize, PortalError> {
        require_role(caller, Role::Admin)?;
        Ok(self.store.delete_assignments_by_course(course_code)?)
    }

    pub fn delete_assignments_by_faculty(
        &mut self,
        caller: &Caller,
        faculty_id: &str,
    ) -> Result<usize, PortalError> {
        require_role(caller, Role::Admin)?;
        Ok(self.store.delete_assignments_by_faculty(faculty_id)?)
    }

    pub fn assign_elective_faculty(
        &mut self,
        caller: &Caller,
        request: NewElectiveAssignment,
    ) -> Result<ElectiveAssignmentView, PortalError> {
        require_role(caller, Role::Admin)?;
        if !elective_batch_in_range(request.batch) {
            return Err(PortalError::Validation("batch must be between 1 and 5"));
        }
        Ok(self.store.assign_elective_faculty(request)?.into())
    }

    pub fn list_elective_assignments(&self) -> Result<Vec<ElectiveAssignmentView>, PortalError> {
        Ok(self
            .store
            .list_elective_assignments()?
            .into_iter()
            .map(ElectiveAssignmentView::from)
            .collect())
    }

    pub fn elective_assignments_by_faculty(
        &self,
        faculty_id: &str,
    ) -> Result<Vec<ElectiveAssignmentView>, PortalError> {
        Ok(self
            .store
            .elective_assignments_by_faculty(faculty_id)?
            .into_iter()
            .map(ElectiveAssignmentView::from)
            .collect())
    }

    pub fn elective_assignments_for(
        &self,
        elective_code: &str,
        batch: i64,
    ) -> Result<Vec<ElectiveAssignmentView>, PortalError> {
        Ok(self
            .store
            .elective_assignments_for(elective_code, batch)?
            .into_iter()
            .map(ElectiveAssignmentView::from)
            .collect())
    }

    pub fn delete_elective_assignment(
        &mut self,
        caller: &Caller,
        id: i64,
    ) -> Result<(), PortalError> {
        require_role(caller, Role::Admin)?;
        match self.store.delete_elective_assignment(id) {
            Ok(()) => Ok(()),
            Err(StoreError::UnknownId) => Err(PortalError::NotFound("elective assignment")),
            Err(err) => Err(err.into()),
        }
    }
}
