#![forbid(unsafe_code)]

use dp_storage::StoreError;

#[derive(Debug)]
pub enum PortalError {
    /// The named entity does not resolve to a stored record.
    NotFound(&'static str),
    /// The operation would violate a uniqueness invariant.
    Duplicate(&'static str),
    /// A field is missing or outside its declared range.
    Validation(&'static str),
    /// No valid credential for the supplied identity.
    Unauthorized,
    /// Valid credential, but the role or ownership check failed.
    Forbidden(&'static str),
    /// The persistence layer failed unexpectedly.
    Store(StoreError),
}

impl PortalError {
    /// Stable code for the HTTP shell's status/envelope mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Duplicate(_) => "DUPLICATE",
            Self::Validation(_) => "VALIDATION",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Store(_) => "STORE",
        }
    }
}

impl std::fmt::Display for PortalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::Duplicate(what) => write!(f, "duplicate {what}"),
            Self::Validation(message) => write!(f, "validation: {message}"),
            Self::Unauthorized => write!(f, "invalid credentials"),
            Self::Forbidden(message) => write!(f, "forbidden: {message}"),
            Self::Store(err) => write!(f, "store: {err}"),
        }
    }
}

impl std::error::Error for PortalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for PortalError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate(what) => Self::Duplicate(what),
            StoreError::UnknownId => Self::NotFound("record"),
            StoreError::InvalidInput(message) => Self::Validation(message),
            other => Self::Store(other),
        }
    }
}
