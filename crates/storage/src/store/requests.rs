#![forbid(unsafe_code)]

use dp_core::scoring::QuestionRating;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub id: String,
    pub role: String,
    pub name: String,
    pub password: String,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStudent {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub batch: String,
    pub joined_year: i64,
    pub current_semester: i64,
}

/// Partial student update; `None` leaves the stored field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub batch: Option<String>,
    pub joined_year: Option<i64>,
    pub current_semester: Option<i64>,
    pub feedback_given: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewFaculty {
    pub id: String,
    pub name: String,
    pub designation: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacultyUpdate {
    pub name: Option<String>,
    pub designation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub semester: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseUpdate {
    pub name: Option<String>,
    pub semester: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewElectiveCourse {
    pub code: String,
    pub name: String,
    pub semester: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCourseAssignment {
    pub course_code: String,
    pub faculty_id: String,
    pub semester: i64,
    pub batch: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewElectiveAssignment {
    pub elective_code: String,
    pub faculty_id: String,
    pub batch: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewFeedback {
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
pub struct NewGrievance {
    pub student_id: String,
    pub faculty_id: Option<String>,
    pub course_code: Option<String>,
    pub batch: String,
    pub semester: i64,
    pub category: String,
    pub subject: String,
    pub body: String,
    pub created_at_ms: i64,
}
