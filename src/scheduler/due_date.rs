use super::{DueDate, Outcome, ScheduleOptions, ScheduleRequest};
use crate::leave::LeaveCalendar;
use crate::model::{Salesperson, WorkSchedule};
use chrono::{Datelike, Duration, NaiveDateTime};
use tracing::{debug, warn};

pub(super) fn plan<L: LeaveCalendar + ?Sized>(
    leaves: &L,
    opts: ScheduleOptions,
    request: ScheduleRequest<'_>,
    now: NaiveDateTime,
) -> DueDate {
    let delay = request.delay.max(Duration::zero());

    let mut candidate = shift(request.base_time, delay);
    if candidate < now {
        candidate = shift(now, delay);
    }

    let Some((person, schedule)) = request
        .salesperson
        .filter(|p| p.active)
        .and_then(|p| p.work_schedule().map(|s| (p, s)))
    else {
        return DueDate {
            at: candidate.max(now),
            outcome: Outcome::Unadjusted,
        };
    };

    if candidate >= now
        && schedule.is_work_moment(candidate)
        && !leaves.is_on_leave_at(&person.id, candidate)
    {
        debug!(salesperson = %person.handle, due = %candidate, "due date already inside work hours");
        return DueDate {
            at: candidate,
            outcome: Outcome::InWindow,
        };
    }

    if let Some(found) = search(leaves, opts, person, schedule, candidate, delay, now) {
        debug!(salesperson = %person.handle, due = %found.at, outcome = found.outcome.as_str(), "due date moved");
        return found;
    }

    let at = shift(now, delay).max(now);
    warn!(
        salesperson = %person.handle,
        horizon_days = opts.horizon_days,
        due = %at,
        "no working slot within horizon, falling back to now + delay"
    );
    DueDate {
        at,
        outcome: Outcome::Fallback,
    }
}

/// Parcourt les jours à partir de celui du candidat (ou d'aujourd'hui).
fn search<L: LeaveCalendar + ?Sized>(
    leaves: &L,
    opts: ScheduleOptions,
    person: &Salesperson,
    schedule: &WorkSchedule,
    candidate: NaiveDateTime,
    delay: Duration,
    now: NaiveDateTime,
) -> Option<DueDate> {
    let today = now.date();
    let first_day = candidate.date().max(today);

    for day in first_day.iter_days().take(opts.horizon_days as usize) {
        if !schedule.works_on(day.weekday()) {
            continue;
        }

        let work_start = schedule.work_start_on(day);
        if leaves.is_on_leave_at(&person.id, work_start) {
            continue;
        }

        if day == today && schedule.covers(now.time()) {
            let soon = shift(now, delay).max(now);
            if delay < opts.short_delay
                && schedule.is_work_moment(soon)
                && !leaves.is_on_leave_at(&person.id, soon)
            {
                return Some(DueDate {
                    at: soon,
                    outcome: Outcome::Immediate,
                });
            }
            // un délai long ne se réduit pas à « tout de suite », ni un délai
            // court qui déborde de la journée ou tombe dans un congé

            continue;
        }

        if work_start < now || work_start < candidate {
            continue;
        }

        return Some(DueDate {
            at: work_start,
            outcome: Outcome::NextWorkday,
        });
    }

    None
}

fn shift(at: NaiveDateTime, delay: Duration) -> NaiveDateTime {
    at.checked_add_signed(delay).unwrap_or(NaiveDateTime::MAX)
}
