mod due_date;
mod types;

pub use types::{DueDate, Outcome, ScheduleOptions, ScheduleRequest};

use crate::leave::LeaveCalendar;
use crate::model::Salesperson;
use chrono::{Duration, NaiveDateTime};

/// Calcul d'échéances de relance respectant horaires et congés d'un vendeur.
///
/// Pur à `now` près : l'instant courant est toujours passé en paramètre.
#[derive(Debug)]
pub struct WorkHoursScheduler<'a, L: LeaveCalendar + ?Sized> {
    leaves: &'a L,
    opts: ScheduleOptions,
}

impl<'a, L: LeaveCalendar + ?Sized> WorkHoursScheduler<'a, L> {
    pub fn new(leaves: &'a L) -> Self {
        Self {
            leaves,
            opts: ScheduleOptions::default(),
        }
    }

    pub fn with_options(leaves: &'a L, opts: ScheduleOptions) -> Self {
        Self { leaves, opts }
    }

    pub fn options(&self) -> ScheduleOptions {
        self.opts
    }

    /// Échéance pour `base_time + delay`, jamais avant `now`.
    pub fn compute_due_date(
        &self,
        salesperson: Option<&Salesperson>,
        base_time: NaiveDateTime,
        delay: Duration,
        now: NaiveDateTime,
    ) -> NaiveDateTime {
        self.plan(ScheduleRequest::new(salesperson, base_time, delay), now).at
    }

    /// Comme [`compute_due_date`](Self::compute_due_date), en précisant l'issue.
    pub fn plan(&self, request: ScheduleRequest<'_>, now: NaiveDateTime) -> DueDate {
        due_date::plan(self.leaves, self.opts, request, now)
    }
}
