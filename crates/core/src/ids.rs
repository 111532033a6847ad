#![forbid(unsafe_code)]

//! External identifiers (register numbers, faculty ids, course codes) arrive
//! from roster imports and request bodies as plain strings. Canonicalization
//! trims whitespace and rejects anything that could not be a printed id.

const MAX_ID_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdError {
    Empty,
    TooLong,
    InvalidChar { ch: char, index: usize },
}

impl std::fmt::Display for IdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "id must not be empty"),
            Self::TooLong => write!(f, "id is too long (max {MAX_ID_LEN})"),
            Self::InvalidChar { ch, index } => {
                write!(f, "id contains invalid char {ch:?} at index {index}")
            }
        }
    }
}

impl std::error::Error for IdError {}

/// Trim and validate an external id. Ids are ASCII alphanumerics plus a small
/// set of separators; control characters and embedded whitespace are rejected.
pub fn canonical_id(value: &str) -> Result<String, IdError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.len() > MAX_ID_LEN {
        return Err(IdError::TooLong);
    }
    for (index, ch) in value.chars().enumerate() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-' | '/') {
            continue;
        }
        return Err(IdError::InvalidChar { ch, index });
    }
    Ok(value.to_string())
}
