use super::{Escalation, FollowUpService, OverdueEntry};
use chrono::NaiveDateTime;
use tracing::info;

pub(super) fn overdue(service: &FollowUpService, now: NaiveDateTime) -> Vec<OverdueEntry> {
    let mut out: Vec<OverdueEntry> = service
        .team
        .follow_ups
        .iter()
        .filter(|f| f.is_pending() && f.due_at < now)
        .map(|f| OverdueEntry {
            follow_up: f.id.clone(),
            salesperson: f.salesperson.clone(),
            due_at: f.due_at,
            minutes_overdue: (now - f.due_at).num_minutes(),
            escalation_level: f.escalation_level,
        })
        .collect();
    out.sort_by_key(|e| e.due_at);
    out
}

/// Un palier au plus par appel : le palier `n + 1` exige `(n + 1) × seuil` de retard.
pub(super) fn escalate(service: &mut FollowUpService, now: NaiveDateTime) -> Vec<Escalation> {
    let step = service.settings.escalation_step();
    let mut out = Vec::new();

    for f in service.team.follow_ups.iter_mut() {
        if !f.is_pending() || f.due_at >= now {
            continue;
        }
        let next_level = f.escalation_level.saturating_add(1);
        let threshold = step * i32::from(next_level);
        if now - f.due_at < threshold {
            continue;
        }
        f.escalation_level = next_level;
        info!(follow_up = f.id.as_str(), level = next_level, "follow-up escalated");
        out.push(Escalation {
            follow_up: f.id.clone(),
            salesperson: f.salesperson.clone(),
            level: next_level,
        });
    }

    out
}
