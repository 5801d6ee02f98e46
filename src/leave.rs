use crate::model::{LeaveInterval, SalespersonId, Team};
use chrono::NaiveDateTime;

/// Source de congés consultée par le calcul d'échéance (lecture seule).
pub trait LeaveCalendar {
    /// Vrai si un congé approuvé couvre `at` pour ce vendeur.
    fn is_on_leave_at(&self, salesperson: &SalespersonId, at: NaiveDateTime) -> bool;
}

/// Congés d'un seul vendeur, l'identifiant est ignoré.
impl LeaveCalendar for [LeaveInterval] {
    fn is_on_leave_at(&self, _salesperson: &SalespersonId, at: NaiveDateTime) -> bool {
        self.iter().any(|leave| leave.blocks(at))
    }
}

impl LeaveCalendar for Vec<LeaveInterval> {
    fn is_on_leave_at(&self, salesperson: &SalespersonId, at: NaiveDateTime) -> bool {
        self.as_slice().is_on_leave_at(salesperson, at)
    }
}

impl LeaveCalendar for Team {
    fn is_on_leave_at(&self, salesperson: &SalespersonId, at: NaiveDateTime) -> bool {
        self.find_by_id(salesperson)
            .is_some_and(|p| p.leaves.is_on_leave_at(salesperson, at))
    }
}
