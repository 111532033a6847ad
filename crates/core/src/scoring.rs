#![forbid(unsafe_code)]

//! Feedback score arithmetic. A submission carries an ordered list of
//! per-question ratings (1..=5); the submission score is normalized out of
//! [`SCORE_SCALE`]. All quotients are plain floating-point division; rounding
//! happens only at presentation points via [`round2`].

/// Fixed normalization denominator: 11 questions at a maximum rating of 5.
/// Applied as-is even when a submission carries a different number of
/// ratings; the value is a business constant, never derived from the list
/// length.
pub const SCORE_DENOMINATOR: f64 = 55.0;

/// Submission scores are presented out of 25.
pub const SCORE_SCALE: f64 = 25.0;

/// One answered question inside a feedback submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionRating {
    pub question: String,
    pub rating: u8,
}

/// Normalized score for one submission: `sum(ratings) / 55 * 25`.
/// An empty rating list scores 0.
pub fn submission_score(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: u32 = ratings.iter().map(|rating| u32::from(*rating)).sum();
    f64::from(total) / SCORE_DENOMINATOR * SCORE_SCALE
}

/// Plain mean; 0 for an empty slice so aggregate views never surface NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Index-aligned per-question averages across a feedback set. The question
/// count comes from the first row; a row missing its i-th rating contributes
/// 0 for that question, and the divisor is always the row count.
pub fn question_averages(rows: &[Vec<u8>]) -> Vec<f64> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let question_count = first.len();
    let mut averages = Vec::with_capacity(question_count);
    for index in 0..question_count {
        let total: u32 = rows
            .iter()
            .map(|row| row.get(index).copied().map_or(0, u32::from))
            .sum();
        averages.push(f64::from(total) / rows.len() as f64);
    }
    averages
}

/// Round to two decimal places for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
