#![forbid(unsafe_code)]

use crate::{Portal, PortalError};
use dp_core::{Role, semester};
use dp_storage::NewUser;
use serde::Serialize;
use time::Date;

const ADMIN_ID: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    pub id: String,
    pub password: String,
    pub role: Role,
}

/// Profile returned on a successful login. Role-specific fields stay `None`
/// for the other roles; the password is never echoed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_semester: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_given: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl Portal {
    /// Idempotently provision credential records: the fixed admin account,
    /// plus one per stored student and faculty. Returns how many records
    /// were newly created.
    pub fn setup_accounts(&mut self) -> Result<usize, PortalError> {
        let mut created = 0;

        if self.store.ensure_user(NewUser {
            id: ADMIN_ID.to_string(),
            role: Role::Admin.as_str().to_string(),
            name: "Administrator".to_string(),
            password: ADMIN_PASSWORD.to_string(),
            email: Some("admin@college.edu".to_string()),
        })? {
            created += 1;
        }

        for student in self.store.list_students()? {
            if self.store.ensure_user(NewUser {
                id: student.id.clone(),
                role: Role::Student.as_str().to_string(),
                name: student.name,
                password: student_password(&student.id),
                email: student.email,
            })? {
                created += 1;
            }
        }

        for faculty in self.store.list_faculty()? {
            if self.store.ensure_user(NewUser {
                id: faculty.id.clone(),
                role: Role::Faculty.as_str().to_string(),
                name: faculty.name.clone(),
                password: faculty_password(&faculty.name, &faculty.id),
                email: None,
            })? {
                created += 1;
            }
        }

        Ok(created)
    }

    pub fn login(&mut self, request: LoginRequest) -> Result<SessionView, PortalError> {
        self.login_at(request, time::OffsetDateTime::now_utc().date())
    }

    /// Login with an explicit "today", so the semester side effect is
    /// deterministic under test. A student whose computed semester moved on
    /// gets the stored semester updated and the feedback-completion flag
    /// reset in the same statement.
    pub fn login_at(
        &mut self,
        request: LoginRequest,
        today: Date,
    ) -> Result<SessionView, PortalError> {
        let Some(user) = self.store.get_user(&request.id, request.role.as_str())? else {
            return Err(PortalError::Unauthorized);
        };
        if user.password != request.password {
            return Err(PortalError::Unauthorized);
        }

        let mut view = SessionView {
            id: user.id,
            name: user.name,
            role: user.role,
            email: user.email,
            batch: None,
            current_semester: None,
            joined_year: None,
            feedback_given: None,
            designation: None,
        };

        match request.role {
            Role::Student => {
                if let Some(mut student) = self.store.get_student(&view.id)? {
                    let computed = semester::semester_for(
                        student.joined_year,
                        i64::from(today.year()),
                        u8::from(today.month()),
                    );
                    if computed != student.current_semester {
                        self.store.apply_semester(&student.id, computed)?;
                        student.current_semester = computed;
                        student.feedback_given = false;
                    }
                    view.batch = Some(student.batch);
                    view.current_semester = Some(student.current_semester);
                    view.joined_year = Some(student.joined_year);
                    view.feedback_given = Some(student.feedback_given);
                }
            }
            Role::Faculty => {
                if let Some(faculty) = self.store.get_faculty(&view.id)? {
                    view.designation = faculty.designation;
                }
            }
            Role::Admin => {}
        }

        Ok(view)
    }

    /// Password recovery hint, phrased per role.
    pub fn password_hint(&self, id: &str, role: Role) -> Result<String, PortalError> {
        match role {
            Role::Student => {
                let Some(student) = self.store.get_student(id)? else {
                    return Err(PortalError::NotFound("student"));
                };
                Ok(format!(
                    "Password is the last digit of your ID: {}",
                    student_password(&student.id)
                ))
            }
            Role::Faculty => {
                let Some(faculty) = self.store.get_faculty(id)? else {
                    return Err(PortalError::NotFound("faculty"));
                };
                Ok(format!(
                    "Password format: {}[your_id]123",
                    name_prefix(&faculty.name)
                ))
            }
            Role::Admin => Ok("Admin password is predefined".to_string()),
        }
    }
}

/// Last character of the student id.
pub(crate) fn student_password(id: &str) -> String {
    id.chars().last().map(String::from).unwrap_or_default()
}

/// First four characters of the name, lowercased, then the id, then "123".
pub(crate) fn faculty_password(name: &str, id: &str) -> String {
    format!("{}{id}123", name_prefix(name))
}

/// Lowercased first name plus the last four characters of the id; used for
/// credentials minted during bulk student import.
pub(crate) fn imported_student_password(name: &str, id: &str) -> String {
    let first_name = name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    let tail_start = id.chars().count().saturating_sub(4);
    let tail: String = id.chars().skip(tail_start).collect();
    format!("{first_name}{tail}")
}

fn name_prefix(name: &str) -> String {
    name.chars().take(4).collect::<String>().to_lowercase()
}
