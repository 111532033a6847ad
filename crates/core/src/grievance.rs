#![forbid(unsafe_code)]

//! Grievance lifecycle. `Pending` is the initial state, `In Progress` the
//! only intermediate one. `Resolved` and `Rejected` are terminal and never
//! persist: reaching either deletes the grievance and leaves a notification
//! for the submitting student as the only record of the outcome.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrievanceStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl GrievanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Self::Pending),
            "In Progress" => Some(Self::InProgress),
            "Resolved" => Some(Self::Resolved),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }
}

impl std::fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification text delivered to the student when a grievance reaches a
/// terminal status. Embeds the original subject, the outcome, and the admin
/// response verbatim.
pub fn resolution_message(subject: &str, status: GrievanceStatus, admin_response: &str) -> String {
    format!(
        "Your grievance regarding \"{subject}\" has been {}. Response: {admin_response}",
        status.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for status in [
            GrievanceStatus::Pending,
            GrievanceStatus::InProgress,
            GrievanceStatus::Resolved,
            GrievanceStatus::Rejected,
        ] {
            assert_eq!(GrievanceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(GrievanceStatus::parse("Closed"), None);
    }

    #[test]
    fn only_resolved_and_rejected_are_terminal() {
        assert!(!GrievanceStatus::Pending.is_terminal());
        assert!(!GrievanceStatus::InProgress.is_terminal());
        assert!(GrievanceStatus::Resolved.is_terminal());
        assert!(GrievanceStatus::Rejected.is_terminal());
    }

    #[test]
    fn resolution_message_embeds_subject_status_and_response() {
        let message = resolution_message(
            "Projector broken in LH-3",
            GrievanceStatus::Resolved,
            "Replaced on Monday",
        );
        assert_eq!(
            message,
            "Your grievance regarding \"Projector broken in LH-3\" has been Resolved. \
             Response: Replaced on Monday"
        );
    }
}
