#![forbid(unsafe_code)]

use crate::{
    Caller, Portal, PortalError, now_ms, require_role, require_roles, require_self_or_admin,
};
use dp_core::scoring::{self, QuestionRating};
use dp_core::{Role, rating_in_range, semester_in_range};
use dp_storage::{FeedbackRow, NewFeedback};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitFeedback {
    pub student_id: String,
    pub faculty_id: String,
    pub course_code: String,
    pub batch: String,
    pub semester: i64,
    pub questions: Vec<QuestionRating>,
    pub comments: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeedbackView {
    pub id: i64,
    pub student_id: String,
    pub faculty_id: String,
    pub course_code: String,
    pub batch: String,
    pub semester: i64,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_at_ms: i64,
}

impl From<FeedbackRow> for FeedbackView {
    fn from(row: FeedbackRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            faculty_id: row.faculty_id,
            course_code: row.course_code,
            batch: row.batch,
            semester: row.semester,
            score: row.score,
            comments: row.comments,
            created_at_ms: row.created_at_ms,
        }
    }
}

/// Per-question average over everything submitted for one faculty member.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuestionAverage {
    pub question: String,
    pub average: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CourseAverage {
    pub course_code: String,
    pub average: f64,
    pub submissions: usize,
}

impl Portal {
    pub fn submit_feedback(
        &mut self,
        caller: &Caller,
        request: SubmitFeedback,
    ) -> Result<FeedbackView, PortalError> {
        self.submit_feedback_at(caller, request, now_ms())
    }

    /// Submission with an explicit timestamp so yearly grouping is
    /// deterministic under test. The score is computed here, never accepted
    /// from the caller.
    pub fn submit_feedback_at(
        &mut self,
        caller: &Caller,
        request: SubmitFeedback,
        created_at_ms: i64,
    ) -> Result<FeedbackView, PortalError> {
        require_role(caller, Role::Student)?;
        require_self_or_admin(caller, &request.student_id)?;
        if !semester_in_range(request.semester) {
            return Err(PortalError::Validation("semester must be between 1 and 8"));
        }
        if request.questions.is_empty() {
            return Err(PortalError::Validation("at least one rating is required"));
        }
        if !request
            .questions
            .iter()
            .all(|entry| rating_in_range(entry.rating))
        {
            return Err(PortalError::Validation("ratings must be between 1 and 5"));
        }

        let ratings: Vec<u8> = request.questions.iter().map(|entry| entry.rating).collect();
        let score = scoring::submission_score(&ratings);

        let row = self.store.insert_feedback(NewFeedback {
            student_id: request.student_id,
            faculty_id: request.faculty_id,
            course_code: request.course_code,
            batch: request.batch,
            semester: request.semester,
            questions: request.questions,
            comments: request.comments,
            score,
            created_at_ms,
        })?;
        Ok(row.into())
    }

    /// Whether the student already submitted for the given tuple; used by the
    /// client to disable the form rather than surface a duplicate error.
    pub fn feedback_exists(
        &self,
        caller: &Caller,
        student_id: &str,
        course_code: &str,
        batch: &str,
        semester: i64,
    ) -> Result<bool, PortalError> {
        require_roles(caller, &[Role::Student, Role::Admin])?;
        require_self_or_admin(caller, student_id)?;
        Ok(self
            .store
            .find_feedback(student_id, course_code, batch, semester)?
            .is_some())
    }

    pub fn list_feedback(&self, caller: &Caller) -> Result<Vec<FeedbackView>, PortalError> {
        require_role(caller, Role::Admin)?;
        Ok(self
            .store
            .list_feedback()?
            .into_iter()
            .map(FeedbackView::from)
            .collect())
    }

    pub fn feedback_by_faculty(
        &self,
        caller: &Caller,
        faculty_id: &str,
    ) -> Result<Vec<FeedbackView>, PortalError> {
        require_roles(caller, &[Role::Faculty, Role::Admin])?;
        Ok(self
            .store
            .feedback_by_faculty(faculty_id)?
            .into_iter()
            .map(FeedbackView::from)
            .collect())
    }

    /// Mean submission score for one faculty member, rounded to two
    /// decimals; 0 when nothing has been submitted yet.
    pub fn faculty_average_score(
        &self,
        caller: &Caller,
        faculty_id: &str,
    ) -> Result<f64, PortalError> {
        require_roles(caller, &[Role::Faculty, Role::Admin])?;
        let scores: Vec<f64> = self
            .store
            .feedback_by_faculty(faculty_id)?
            .iter()
            .map(|row| row.score)
            .collect();
        Ok(scoring::round2(scoring::mean(&scores)))
    }

    /// Index-aligned per-question averages; question texts come from the
    /// most recent submission.
    pub fn faculty_question_averages(
        &self,
        caller: &Caller,
        faculty_id: &str,
    ) -> Result<Vec<QuestionAverage>, PortalError> {
        require_roles(caller, &[Role::Faculty, Role::Admin])?;
        let rows = self.store.feedback_by_faculty(faculty_id)?;
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        let questions: Vec<String> = first
            .questions
            .iter()
            .map(|entry| entry.question.clone())
            .collect();
        let rating_rows: Vec<Vec<u8>> = rows
            .iter()
            .map(|row| row.questions.iter().map(|entry| entry.rating).collect())
            .collect();
        let averages = scoring::question_averages(&rating_rows);

        Ok(questions
            .into_iter()
            .zip(averages)
            .map(|(question, average)| QuestionAverage {
                question,
                average: scoring::round2(average),
            })
            .collect())
    }

    /// Per-course average of each submission's own mean rating, on the
    /// 0..=5 rating scale rather than the 0..=25 score scale.
    pub fn faculty_course_averages(
        &self,
        caller: &Caller,
        faculty_id: &str,
    ) -> Result<Vec<CourseAverage>, PortalError> {
        require_roles(caller, &[Role::Faculty, Role::Admin])?;
        let mut by_course: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in self.store.feedback_by_faculty(faculty_id)? {
            let ratings: Vec<f64> = row
                .questions
                .iter()
                .map(|entry| f64::from(entry.rating))
                .collect();
            by_course
                .entry(row.course_code)
                .or_default()
                .push(scoring::mean(&ratings));
        }
        Ok(by_course
            .into_iter()
            .map(|(course_code, scores)| CourseAverage {
                course_code,
                average: scoring::round2(scoring::mean(&scores)),
                submissions: scores.len(),
            })
            .collect())
    }

    /// Mean score per calendar year of submission, keyed by UTC year.
    pub fn faculty_yearly_averages(
        &self,
        caller: &Caller,
        faculty_id: &str,
    ) -> Result<BTreeMap<i32, f64>, PortalError> {
        require_roles(caller, &[Role::Faculty, Role::Admin])?;
        let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for row in self.store.feedback_by_faculty(faculty_id)? {
            by_year
                .entry(year_of_ms(row.created_at_ms))
                .or_default()
                .push(row.score);
        }
        Ok(by_year
            .into_iter()
            .map(|(year, scores)| (year, scoring::round2(scoring::mean(&scores))))
            .collect())
    }
}

fn year_of_ms(created_at_ms: i64) -> i32 {
    let nanos = i128::from(created_at_ms) * 1_000_000;
    time::OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map(|stamp| stamp.year())
        .unwrap_or(1970)
}
