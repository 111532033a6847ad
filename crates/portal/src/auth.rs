#![forbid(unsafe_code)]

use crate::PortalError;
use dp_core::{Role, allow_self_or_admin};

/// Authenticated caller identity, as decoded from the bearer credential by
/// the HTTP shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

pub fn require_role(caller: &Caller, role: Role) -> Result<(), PortalError> {
    if caller.role != role {
        return Err(PortalError::Forbidden("insufficient role"));
    }
    Ok(())
}

pub fn require_roles(caller: &Caller, roles: &[Role]) -> Result<(), PortalError> {
    if !roles.contains(&caller.role) {
        return Err(PortalError::Forbidden("insufficient role"));
    }
    Ok(())
}

/// Self-or-admin ownership check shared by every self-scoped operation.
pub fn require_self_or_admin(caller: &Caller, owner_id: &str) -> Result<(), PortalError> {
    if !allow_self_or_admin(caller.role, &caller.id, owner_id) {
        return Err(PortalError::Forbidden("not your resource"));
    }
    Ok(())
}
