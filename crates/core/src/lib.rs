#![forbid(unsafe_code)]

pub mod grievance;
pub mod ids;
pub mod roles;
pub mod scoring;
pub mod semester;

pub use grievance::GrievanceStatus;
pub use ids::canonical_id;
pub use roles::{Role, allow_self_or_admin};

/// Core-curriculum semesters run 1..=8.
pub const SEMESTER_MIN: i64 = 1;
pub const SEMESTER_MAX: i64 = 8;

/// Per-question feedback ratings run 1..=5.
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// Elective batches are numbered 1..=5.
pub const ELECTIVE_BATCH_MIN: i64 = 1;
pub const ELECTIVE_BATCH_MAX: i64 = 5;

pub fn semester_in_range(semester: i64) -> bool {
    (SEMESTER_MIN..=SEMESTER_MAX).contains(&semester)
}

pub fn rating_in_range(rating: u8) -> bool {
    (RATING_MIN..=RATING_MAX).contains(&rating)
}

pub fn elective_batch_in_range(batch: i64) -> bool {
    (ELECTIVE_BATCH_MIN..=ELECTIVE_BATCH_MAX).contains(&batch)
}
