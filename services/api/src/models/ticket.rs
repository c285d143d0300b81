//! Support tickets and their state machine.
//!
//! A ticket starts `open` and may move to `solved` (owner resolves it) or
//! `closed` (admin hard close). There is no way out of `solved` or `closed`,
//! and edits are only permitted while a ticket is still open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Solved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Solved => "solved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<TicketStatus> {
        match value {
            "open" => Some(TicketStatus::Open),
            "solved" => Some(TicketStatus::Solved),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }

    pub fn from_db(value: &str) -> TicketStatus {
        Self::parse(value).unwrap_or(TicketStatus::Open)
    }

    /// The only legal transitions are `open -> solved` and `open -> closed`.
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Open, TicketStatus::Solved) | (TicketStatus::Open, TicketStatus::Closed)
        )
    }

    pub fn is_open(self) -> bool {
        self == TicketStatus::Open
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub id: Uuid,
    /// Owning username, taken from the verified identity at creation.
    pub username: String,
    pub service_name: String,
    pub problem_description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub service_name: String,
    pub problem_description: String,
}

#[derive(Debug, Deserialize)]
pub struct TicketStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct EditTicketRequest {
    pub problem_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_open_tickets_transition() {
        use TicketStatus::*;

        assert!(Open.can_transition_to(Solved));
        assert!(Open.can_transition_to(Closed));

        for terminal in [Solved, Closed] {
            for next in [Open, Solved, Closed] {
                assert!(
                    !terminal.can_transition_to(next),
                    "{:?} -> {:?} must be rejected",
                    terminal,
                    next
                );
            }
        }
        assert!(!Open.can_transition_to(Open));
    }

    #[test]
    fn unknown_db_status_defaults_to_open() {
        assert_eq!(TicketStatus::from_db("solved"), TicketStatus::Solved);
        assert_eq!(TicketStatus::from_db("weird"), TicketStatus::Open);
    }
}
