#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    /// A uniqueness invariant would be violated; the payload names the
    /// constrained record kind.
    Duplicate(&'static str),
    UnknownId,
    /// A dependent-record cleanup step failed inside a cascading delete.
    /// The enclosing transaction rolls back, so no partial cascade persists.
    CascadeStep {
        step: &'static str,
        message: String,
    },
}

impl StoreError {
    /// Stable machine-readable code for the service layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQL",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Duplicate(_) => "DUPLICATE",
            Self::UnknownId => "UNKNOWN_ID",
            Self::CascadeStep { .. } => "CASCADE_STEP",
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Duplicate(what) => write!(f, "duplicate {what}"),
            Self::UnknownId => write!(f, "unknown id"),
            Self::CascadeStep { step, message } => {
                write!(f, "cascade step failed (step={step}): {message}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
