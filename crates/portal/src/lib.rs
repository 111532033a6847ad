#![forbid(unsafe_code)]

//! Service layer of the department portal. A thin HTTP shell (out of scope
//! here) authenticates a caller, deserializes a request body, and calls one
//! operation. Authorization, validation, score arithmetic, the grievance
//! lifecycle, and cascade bookkeeping all live behind these methods.

mod auth;
mod error;
mod ops;

pub use auth::{Caller, require_role, require_roles, require_self_or_admin};
pub use dp_core::{GrievanceStatus, Role};
pub use error::PortalError;
pub use ops::*;

use dp_storage::SqliteStore;
use std::path::Path;

pub struct Portal {
    store: SqliteStore,
}

impl Portal {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, PortalError> {
        Ok(Self {
            store: SqliteStore::open(storage_dir)?,
        })
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SqliteStore {
        &mut self.store
    }
}

pub(crate) fn now_ms() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}
