use super::{FollowUpError, FollowUpService, Reassignment};
use crate::leave::LeaveCalendar;
use crate::model::{FollowUpId, FollowUpStatus, SalespersonId};
use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

pub(super) fn complete(
    service: &mut FollowUpService,
    id: &FollowUpId,
    now: NaiveDateTime,
) -> Result<(), FollowUpError> {
    let follow_up = service
        .team
        .find_follow_up_mut(id)
        .ok_or_else(|| FollowUpError::UnknownFollowUp(id.as_str().to_string()))?;
    if !follow_up.is_pending() {
        return Err(FollowUpError::AlreadyCompleted(id.as_str().to_string()));
    }
    follow_up.status = FollowUpStatus::Done;
    follow_up.completed_at = Some(now);
    info!(follow_up = id.as_str(), "follow-up completed");
    Ok(())
}

pub(super) fn reassign(
    service: &mut FollowUpService,
    id: &FollowUpId,
    to_handle: &str,
    now: NaiveDateTime,
) -> Result<Reassignment, FollowUpError> {
    let target = service
        .team
        .find_by_handle(to_handle)
        .ok_or_else(|| FollowUpError::UnknownSalesperson(to_handle.to_string()))?;
    if !target.active {
        return Err(FollowUpError::ReassignInvalid("target salesperson inactive"));
    }
    let target = target.id.clone();

    let follow_up = service
        .team
        .find_follow_up(id)
        .ok_or_else(|| FollowUpError::UnknownFollowUp(id.as_str().to_string()))?;
    if !follow_up.is_pending() {
        return Err(FollowUpError::ReassignInvalid("follow-up already completed"));
    }
    if follow_up.salesperson == target {
        return Err(FollowUpError::ReassignInvalid("follow-up already owned by target"));
    }
    let delay = follow_up.delay();

    Ok(move_to(service, id, target, delay, now))
}

/// Réattribue en round-robin les relances ayant atteint le palier configuré.
pub(super) fn reassign_overdue(
    service: &mut FollowUpService,
    now: NaiveDateTime,
) -> Vec<Reassignment> {
    let threshold = service.settings.reassign_after_level;
    let delay = service.settings.reassign_delay();

    let pool: Vec<SalespersonId> = service
        .team
        .salespeople
        .iter()
        .filter(|p| p.active && p.work_schedule().is_some())
        .filter(|p| !service.team.is_on_leave_at(&p.id, now))
        .map(|p| p.id.clone())
        .collect();
    if pool.is_empty() {
        return Vec::new();
    }

    let stale: Vec<(FollowUpId, SalespersonId)> = service
        .team
        .follow_ups
        .iter()
        .filter(|f| f.is_pending() && f.escalation_level >= threshold)
        .map(|f| (f.id.clone(), f.salesperson.clone()))
        .collect();

    let total = pool.len();
    let mut cursor = 0usize;
    let mut out = Vec::new();

    for (id, owner) in stale {
        let chosen = (0..total).find_map(|_| {
            let candidate = &pool[cursor];
            cursor = (cursor + 1) % total;
            (candidate != &owner).then(|| candidate.clone())
        });

        match chosen {
            Some(target) => out.push(move_to(service, &id, target, delay, now)),
            None => debug!(follow_up = id.as_str(), "no other salesperson available"),
        }
    }

    out
}

/// Recalcule l'échéance des relances en attente d'un vendeur.
pub(super) fn reschedule_for(
    service: &mut FollowUpService,
    salesperson: &SalespersonId,
    now: NaiveDateTime,
) -> usize {
    let updates: Vec<(usize, NaiveDateTime)> = service
        .team
        .follow_ups
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_pending() && &f.salesperson == salesperson)
        .map(|(idx, f)| {
            let due = service.plan_due_date(Some(salesperson), f.base_time, f.delay(), now);
            (idx, due.at)
        })
        .collect();

    let mut changed = 0usize;
    for (idx, due_at) in updates {
        let f = &mut service.team.follow_ups[idx];
        if f.due_at != due_at {
            f.due_at = due_at;
            changed += 1;
        }
    }
    if changed > 0 {
        info!(salesperson = salesperson.as_str(), changed, "follow-ups rescheduled");
    }
    changed
}

fn move_to(
    service: &mut FollowUpService,
    id: &FollowUpId,
    target: SalespersonId,
    delay: Duration,
    now: NaiveDateTime,
) -> Reassignment {
    let due = service.plan_due_date(Some(&target), now, delay, now);

    let mut from = target.clone();
    if let Some(f) = service.team.find_follow_up_mut(id) {
        from = std::mem::replace(&mut f.salesperson, target.clone());
        f.reassigned_from = Some(from.clone());
        f.base_time = now;
        f.delay_minutes = delay.num_minutes();
        f.due_at = due.at;
        f.escalation_level = 0;
    }
    info!(
        follow_up = id.as_str(),
        from = from.as_str(),
        to = target.as_str(),
        due = %due.at,
        "follow-up reassigned"
    );

    Reassignment {
        follow_up: id.clone(),
        from,
        to: target,
        due_at: due.at,
    }
}
