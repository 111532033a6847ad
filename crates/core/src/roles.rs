#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Self::Student),
            "faculty" => Some(Self::Faculty),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ownership predicate shared by every self-scoped operation: admins may act
/// on any record, everyone else only on the record whose owner id matches
/// their own.
pub fn allow_self_or_admin(caller_role: Role, caller_id: &str, owner_id: &str) -> bool {
    caller_role == Role::Admin || caller_id == owner_id
}
