#![forbid(unsafe_code)]

mod assignments;
mod courses;
mod electives;
mod faculty;
mod feedback;
mod grievances;
mod notifications;
mod sessions;
mod students;

pub use assignments::*;
pub use courses::*;
pub use electives::*;
pub use faculty::*;
pub use feedback::*;
pub use grievances::*;
pub use notifications::*;
pub use sessions::*;
pub use students::*;

use serde::Serialize;

/// Result of a bulk roster import: rows with an already-known id are
/// silently skipped, never an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub inserted: usize,
    pub skipped: usize,
}
