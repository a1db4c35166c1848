//! Time-off request status and its state machine.
//!
//! ```text
//! Pending  -> Approved | Rejected | Cancelled
//! Approved -> Cancelled
//! Rejected, Cancelled: terminal
//! ```
//!
//! Unlike the integer-encoded enums, the status travels and is stored as its
//! name (`"Pending"`, `"Approved"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Maximum length of a time-off reason.
pub const MAX_REASON_LEN: usize = 500;

/// Status of a time-off request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl TimeOffStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOffStatus::Pending => "Pending",
            TimeOffStatus::Approved => "Approved",
            TimeOffStatus::Rejected => "Rejected",
            TimeOffStatus::Cancelled => "Cancelled",
        }
    }

    /// Statuses reachable from `self`.
    pub fn valid_transitions(self) -> &'static [TimeOffStatus] {
        match self {
            TimeOffStatus::Pending => &[
                TimeOffStatus::Approved,
                TimeOffStatus::Rejected,
                TimeOffStatus::Cancelled,
            ],
            TimeOffStatus::Approved => &[TimeOffStatus::Cancelled],
            TimeOffStatus::Rejected | TimeOffStatus::Cancelled => &[],
        }
    }

    pub fn can_transition(self, to: TimeOffStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for TimeOffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOffStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TimeOffStatus::Pending),
            "Approved" => Ok(TimeOffStatus::Approved),
            "Rejected" => Ok(TimeOffStatus::Rejected),
            "Cancelled" => Ok(TimeOffStatus::Cancelled),
            other => Err(format!("Unknown time-off status '{other}'")),
        }
    }
}

/// Validate a status change, returning a readable message for invalid ones.
pub fn validate_transition(from: TimeOffStatus, to: TimeOffStatus) -> Result<(), String> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(format!("Invalid transition: {from} -> {to}"))
    }
}

/// Who is asking for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The employee who filed the request.
    Requester,
    /// A reviewer with the given role (not the requester).
    Reviewer(Role),
}

/// Whether `actor` may move a request into `to`.
///
/// Requesters may only cancel. Approving and rejecting need the Manager
/// role; a Manager may also cancel on someone's behalf.
pub fn may_set_status(actor: Actor, to: TimeOffStatus) -> bool {
    match (actor, to) {
        (_, TimeOffStatus::Pending) => false,
        (Actor::Requester, TimeOffStatus::Cancelled) => true,
        (Actor::Requester, _) => false,
        (Actor::Reviewer(role), _) => role == Role::Manager,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_transitions() {
        assert!(TimeOffStatus::Pending.can_transition(TimeOffStatus::Approved));
        assert!(TimeOffStatus::Pending.can_transition(TimeOffStatus::Rejected));
        assert!(TimeOffStatus::Pending.can_transition(TimeOffStatus::Cancelled));
        assert!(!TimeOffStatus::Pending.can_transition(TimeOffStatus::Pending));
    }

    #[test]
    fn approved_can_only_be_cancelled() {
        assert!(TimeOffStatus::Approved.can_transition(TimeOffStatus::Cancelled));
        assert!(!TimeOffStatus::Approved.can_transition(TimeOffStatus::Rejected));
    }

    #[test]
    fn terminal_states() {
        assert!(TimeOffStatus::Rejected.is_terminal());
        assert!(TimeOffStatus::Cancelled.is_terminal());
        assert!(!TimeOffStatus::Pending.is_terminal());
    }

    #[test]
    fn validate_transition_err_names_both_states() {
        let err = validate_transition(TimeOffStatus::Rejected, TimeOffStatus::Approved).unwrap_err();
        assert!(err.contains("Rejected"));
        assert!(err.contains("Approved"));
    }

    #[test]
    fn string_wire_encoding() {
        assert_eq!(
            serde_json::to_string(&TimeOffStatus::Approved).unwrap(),
            "\"Approved\""
        );
        assert_eq!(
            serde_json::from_str::<TimeOffStatus>("\"Cancelled\"").unwrap(),
            TimeOffStatus::Cancelled
        );
        assert!(serde_json::from_str::<TimeOffStatus>("1").is_err());
        assert_eq!("Pending".parse::<TimeOffStatus>(), Ok(TimeOffStatus::Pending));
        assert!("pending".parse::<TimeOffStatus>().is_err());
    }

    #[test]
    fn requester_may_only_cancel() {
        assert!(may_set_status(Actor::Requester, TimeOffStatus::Cancelled));
        assert!(!may_set_status(Actor::Requester, TimeOffStatus::Approved));
        assert!(!may_set_status(Actor::Requester, TimeOffStatus::Rejected));
    }

    #[test]
    fn only_managers_review() {
        assert!(may_set_status(Actor::Reviewer(Role::Manager), TimeOffStatus::Approved));
        assert!(!may_set_status(Actor::Reviewer(Role::ShiftLeider), TimeOffStatus::Approved));
        assert!(!may_set_status(Actor::Reviewer(Role::SuperAdmin), TimeOffStatus::Rejected));
        assert!(!may_set_status(Actor::Reviewer(Role::Manager), TimeOffStatus::Pending));
    }
}
