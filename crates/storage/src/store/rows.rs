#![forbid(unsafe_code)]

use dp_core::scoring::QuestionRating;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub role: String,
    pub name: String,
    pub password: String,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub batch: String,
    pub joined_year: i64,
    pub current_semester: i64,
    pub feedback_given: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacultyRow {
    pub id: String,
    pub name: String,
    pub designation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseRow {
    pub code: String,
    pub name: String,
    pub semester: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElectiveCourseRow {
    pub code: String,
    pub name: String,
    pub semester: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseAssignmentRow {
    pub id: i64,
    pub course_code: String,
    pub faculty_id: String,
    pub semester: i64,
    pub batch: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElectiveAssignmentRow {
    pub id: i64,
    pub elective_code: String,
    pub faculty_id: String,
    pub batch: i64,
}

/// One entry of a student's embedded elective list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElectiveChoice {
    pub elective_code: String,
    pub batch: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElectiveChoicesRow {
    pub student_id: String,
    pub electives: Vec<ElectiveChoice>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackRow {
    pub id: i64,
    pub student_id: String,
    pub faculty_id: String,
    pub course_code: String,
    pub batch: String,
    pub semester: i64,
    pub questions: Vec<QuestionRating>,
    pub comments: Option<String>,
    pub score: f64,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrievanceRow {
    pub id: String,
    pub student_id: String,
    pub faculty_id: Option<String>,
    pub course_code: Option<String>,
    pub batch: String,
    pub semester: i64,
    pub category: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub admin_response: Option<String>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationRow {
    pub id: String,
    pub student_id: String,
    pub grievance_id: String,
    pub message: String,
    pub is_read: bool,
    pub created_at_ms: i64,
}

/// Dependent-record counts removed by the faculty cascade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FacultyCascade {
    pub feedback_deleted: usize,
    pub course_assignments_deleted: usize,
    pub elective_assignments_deleted: usize,
}

/// Dependent-record counts removed by the elective-course cascade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElectiveCascade {
    pub faculty_assignments_deleted: usize,
    pub student_choices_pulled: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrievanceStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub rejected: usize,
}
