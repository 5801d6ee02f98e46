use crate::model::{FollowUpId, SalespersonId};
use chrono::NaiveDateTime;
use thiserror::Error;

/// Relance en retard à l'instant de la vérification.
#[derive(Debug, Clone)]
pub struct OverdueEntry {
    pub follow_up: FollowUpId,
    pub salesperson: SalespersonId,
    pub due_at: NaiveDateTime,
    pub minutes_overdue: i64,
    pub escalation_level: u8,
}

/// Passage d'une relance au palier d'escalade suivant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escalation {
    pub follow_up: FollowUpId,
    pub salesperson: SalespersonId,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub follow_up: FollowUpId,
    pub from: SalespersonId,
    pub to: SalespersonId,
    pub due_at: NaiveDateTime,
}

#[derive(Error, Debug)]
pub enum FollowUpError {
    #[error("unknown salesperson handle: {0}")]
    UnknownSalesperson(String),
    #[error("duplicate salesperson handle: {0}")]
    DuplicateSalesperson(String),
    #[error("unknown follow-up: {0}")]
    UnknownFollowUp(String),
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("follow-up already completed: {0}")]
    AlreadyCompleted(String),
    #[error("reassign invalid: {0}")]
    ReassignInvalid(&'static str),
}
