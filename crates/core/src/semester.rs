#![forbid(unsafe_code)]

//! Semester inference. July 1 of the join year is the start of semester 1,
//! and every elapsed 6 months advances the semester by one. The computed
//! value is deliberately not clamped to 8; stored semesters are validated
//! separately at the points that require the 1..=8 range.

/// Zero-based month index of July, the academic year anchor.
const ANCHOR_MONTH0: i64 = 6;

const MONTHS_PER_SEMESTER: i64 = 6;

/// Current semester for a student who joined in `join_year`, as of the given
/// `now_year` / `now_month` (1-based month).
pub fn semester_for(join_year: i64, now_year: i64, now_month: u8) -> i64 {
    let month0 = i64::from(now_month) - 1;
    let months_elapsed = (now_year - join_year) * 12 + (month0 - ANCHOR_MONTH0);
    months_elapsed.div_euclid(MONTHS_PER_SEMESTER) + 1
}
