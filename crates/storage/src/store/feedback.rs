#![forbid(unsafe_code)]

use super::{FeedbackRow, NewFeedback, SqliteStore, StoreError, canonical_id, map_insert_conflict};
use dp_core::scoring::QuestionRating;
use rusqlite::{OptionalExtension, params};
use serde_json::{Value, json};

impl SqliteStore {
    /// Insert a submission and mark the student's feedback-completion flag
    /// in the same transaction. The (student, course, batch, semester)
    /// uniqueness invariant lives in a unique index, so a duplicate tuple
    /// fails the insert itself rather than a racy pre-check.
    pub fn insert_feedback(&mut self, request: NewFeedback) -> Result<FeedbackRow, StoreError> {
        let student_id = canonical_id(&request.student_id, "invalid student id")?;
        let faculty_id = canonical_id(&request.faculty_id, "invalid faculty id")?;
        let course_code = canonical_id(&request.course_code, "invalid course code")?;

        let tx = self.conn_mut().transaction()?;

        let insert = tx.execute(
            "INSERT INTO feedback(student_id, faculty_id, course_code, batch, semester, \
             ratings_json, comments, score, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                student_id,
                faculty_id,
                course_code,
                request.batch,
                request.semester,
                encode_questions(&request.questions),
                request.comments,
                request.score,
                request.created_at_ms
            ],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, "feedback"));
        }
        let id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE students SET feedback_given=1 WHERE id=?1",
            params![student_id],
        )?;

        tx.commit()?;
        Ok(FeedbackRow {
            id,
            student_id,
            faculty_id,
            course_code,
            batch: request.batch,
            semester: request.semester,
            questions: request.questions,
            comments: request.comments,
            score: request.score,
            created_at_ms: request.created_at_ms,
        })
    }

    pub fn find_feedback(
        &self,
        student_id: &str,
        course_code: &str,
        batch: &str,
        semester: i64,
    ) -> Result<Option<FeedbackRow>, StoreError> {
        let row = self
            .conn()
            .query_row(
                "SELECT id, student_id, faculty_id, course_code, batch, semester, \
                 ratings_json, comments, score, created_at_ms \
                 FROM feedback WHERE student_id=?1 AND course_code=?2 AND batch=?3 AND semester=?4",
                params![student_id, course_code, batch, semester],
                map_raw_feedback,
            )
            .optional()?;
        row.map(into_feedback_row).transpose()
    }

    pub fn feedback_by_faculty(&self, faculty_id: &str) -> Result<Vec<FeedbackRow>, StoreError> {
        let raw = {
            let mut stmt = self.conn().prepare(
                "SELECT id, student_id, faculty_id, course_code, batch, semester, \
                 ratings_json, comments, score, created_at_ms \
                 FROM feedback WHERE faculty_id=?1 ORDER BY created_at_ms DESC, id DESC",
            )?;
            let rows = stmt.query_map(params![faculty_id], map_raw_feedback)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        raw.into_iter().map(into_feedback_row).collect()
    }

    pub fn list_feedback(&self) -> Result<Vec<FeedbackRow>, StoreError> {
        let raw = {
            let mut stmt = self.conn().prepare(
                "SELECT id, student_id, faculty_id, course_code, batch, semester, \
                 ratings_json, comments, score, created_at_ms \
                 FROM feedback ORDER BY created_at_ms DESC, id DESC",
            )?;
            let rows = stmt.query_map([], map_raw_feedback)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        raw.into_iter().map(into_feedback_row).collect()
    }
}

type RawFeedback = (
    i64,
    String,
    String,
    String,
    String,
    i64,
    String,
    Option<String>,
    f64,
    i64,
);

fn map_raw_feedback(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFeedback> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn into_feedback_row(raw: RawFeedback) -> Result<FeedbackRow, StoreError> {
    let (
        id,
        student_id,
        faculty_id,
        course_code,
        batch,
        semester,
        ratings_json,
        comments,
        score,
        created_at_ms,
    ) = raw;
    Ok(FeedbackRow {
        id,
        student_id,
        faculty_id,
        course_code,
        batch,
        semester,
        questions: decode_questions(&ratings_json)?,
        comments,
        score,
        created_at_ms,
    })
}

fn encode_questions(questions: &[QuestionRating]) -> String {
    let items: Vec<Value> = questions
        .iter()
        .map(|entry| {
            json!({
                "question": entry.question,
                "rating": entry.rating,
            })
        })
        .collect();
    Value::Array(items).to_string()
}

fn decode_questions(raw: &str) -> Result<Vec<QuestionRating>, StoreError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|_| StoreError::InvalidInput("corrupt rating list"))?;
    let Some(items) = value.as_array() else {
        return Err(StoreError::InvalidInput("corrupt rating list"));
    };
    let mut questions = Vec::with_capacity(items.len());
    for item in items {
        let question = item
            .get("question")
            .and_then(Value::as_str)
            .ok_or(StoreError::InvalidInput("corrupt rating list"))?;
        let rating = item
            .get("rating")
            .and_then(Value::as_u64)
            .and_then(|rating| u8::try_from(rating).ok())
            .ok_or(StoreError::InvalidInput("corrupt rating list"))?;
        questions.push(QuestionRating {
            question: question.to_string(),
            rating,
        });
    }
    Ok(questions)
}
