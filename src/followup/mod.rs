mod mutate;
mod overdue;
mod types;

pub use types::{Escalation, FollowUpError, OverdueEntry, Reassignment};

use crate::config::Settings;
use crate::model::{
    FollowUp, FollowUpId, FollowUpStatus, LeaveInterval, Salesperson, SalespersonId, Team,
    WorkSchedule, MAX_DELAY_MINUTES,
};
use crate::scheduler::{DueDate, ScheduleRequest, WorkHoursScheduler};
use chrono::{Duration, NaiveDateTime};
use tracing::info;

/// Service de relances : encapsule une Team et ses réglages.
#[derive(Debug, Default)]
pub struct FollowUpService {
    team: Team,
    settings: Settings,
}

impl FollowUpService {
    pub fn new(team: Team, settings: Settings) -> Self {
        Self { team, settings }
    }

    pub fn team(&self) -> &Team {
        &self.team
    }
    pub fn team_mut(&mut self) -> &mut Team {
        &mut self.team
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ajoute des vendeurs ; rien n'est ajouté si un handle existe déjà.
    pub fn add_salespeople(&mut self, people: Vec<Salesperson>) -> Result<(), FollowUpError> {
        for (idx, person) in people.iter().enumerate() {
            let taken = self.team.find_by_handle(&person.handle).is_some()
                || people[..idx].iter().any(|p| p.handle == person.handle);
            if taken {
                return Err(FollowUpError::DuplicateSalesperson(person.handle.clone()));
            }
        }
        self.team.salespeople.extend(people);
        Ok(())
    }

    /// Calcule une échéance sans rien enregistrer.
    pub fn plan_due_date(
        &self,
        salesperson: Option<&SalespersonId>,
        base_time: NaiveDateTime,
        delay: Duration,
        now: NaiveDateTime,
    ) -> DueDate {
        let scheduler =
            WorkHoursScheduler::with_options(&self.team, self.settings.schedule_options());
        let person = salesperson.and_then(|id| self.team.find_by_id(id));
        scheduler.plan(ScheduleRequest::new(person, base_time, delay), now)
    }

    /// Crée une relance pour `lead`, échéance calée sur les horaires du vendeur.
    pub fn create_follow_up(
        &mut self,
        lead: &str,
        handle: &str,
        base_time: NaiveDateTime,
        delay: Duration,
        now: NaiveDateTime,
    ) -> Result<FollowUpId, FollowUpError> {
        let person_id = self.salesperson_id(handle)?;
        let due = self.plan_due_date(Some(&person_id), base_time, delay, now);

        let follow_up = FollowUp {
            id: FollowUpId::random(),
            lead: lead.to_string(),
            salesperson: person_id,
            base_time,
            delay_minutes: delay.num_minutes().clamp(0, MAX_DELAY_MINUTES),
            due_at: due.at,
            status: FollowUpStatus::Pending,
            escalation_level: 0,
            reassigned_from: None,
            created_at: now,
            completed_at: None,
        };
        let id = follow_up.id.clone();
        info!(
            follow_up = id.as_str(),
            salesperson = handle,
            due = %due.at,
            outcome = due.outcome.as_str(),
            "follow-up created"
        );
        self.team.follow_ups.push(follow_up);
        Ok(id)
    }

    pub fn complete(&mut self, id: &FollowUpId, now: NaiveDateTime) -> Result<(), FollowUpError> {
        mutate::complete(self, id, now)
    }

    pub fn overdue(&self, now: NaiveDateTime) -> Vec<OverdueEntry> {
        overdue::overdue(self, now)
    }

    pub fn escalate(&mut self, now: NaiveDateTime) -> Vec<Escalation> {
        overdue::escalate(self, now)
    }

    pub fn reassign(
        &mut self,
        id: &FollowUpId,
        to_handle: &str,
        now: NaiveDateTime,
    ) -> Result<Reassignment, FollowUpError> {
        mutate::reassign(self, id, to_handle, now)
    }

    pub fn reassign_overdue(&mut self, now: NaiveDateTime) -> Vec<Reassignment> {
        mutate::reassign_overdue(self, now)
    }

    pub fn reschedule_for(&mut self, salesperson: &SalespersonId, now: NaiveDateTime) -> usize {
        mutate::reschedule_for(self, salesperson, now)
    }

    /// Remplace les horaires d'un vendeur puis recale ses relances en attente.
    pub fn set_schedule(
        &mut self,
        handle: &str,
        schedule: WorkSchedule,
        now: NaiveDateTime,
    ) -> Result<usize, FollowUpError> {
        if !schedule.is_configured() {
            return Err(FollowUpError::InvalidSchedule(
                "at least one workday with end_time after start_time".to_string(),
            ));
        }
        let person = self
            .team
            .find_mut_by_handle(handle)
            .ok_or_else(|| FollowUpError::UnknownSalesperson(handle.to_string()))?;
        person.schedule = Some(schedule);
        let id = person.id.clone();
        Ok(self.reschedule_for(&id, now))
    }

    /// Ajoute un congé ; s'il est approuvé, les relances en attente sont recalées.
    pub fn add_leave(
        &mut self,
        handle: &str,
        leave: LeaveInterval,
        now: NaiveDateTime,
    ) -> Result<usize, FollowUpError> {
        let approved = leave.is_approved();
        let person = self
            .team
            .find_mut_by_handle(handle)
            .ok_or_else(|| FollowUpError::UnknownSalesperson(handle.to_string()))?;
        person.leaves.push(leave);
        let id = person.id.clone();
        if approved {
            Ok(self.reschedule_for(&id, now))
        } else {
            Ok(0)
        }
    }

    fn salesperson_id(&self, handle: &str) -> Result<SalespersonId, FollowUpError> {
        self.team
            .find_by_handle(handle)
            .map(|p| p.id.clone())
            .ok_or_else(|| FollowUpError::UnknownSalesperson(handle.to_string()))
    }
}
