use crate::model::{LeaveInterval, LeaveStatus, Salesperson, Team, WorkSchedule};
use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de vendeurs depuis CSV: header `handle,display_name,days,start_time,end_time[,active]`
///
/// `days` vide = pas d'horaires (aucun ajustement des échéances).
pub fn import_salespeople_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Salesperson>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).flexible(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        let display = rec.get(1).context("missing display_name")?.trim();
        if handle.is_empty() || display.is_empty() {
            bail!("invalid salesperson row (empty)");
        }
        if out.iter().any(|p: &Salesperson| p.handle == handle) {
            bail!("duplicate salesperson handle: {handle}");
        }
        let mut person = Salesperson::new(handle, display);

        let days = rec.get(2).map(str::trim).unwrap_or("");
        if !days.is_empty() {
            let days = parse_days(days).with_context(|| format!("invalid days for handle {handle}"))?;
            let start = parse_time(rec.get(3).context("missing start_time")?)?;
            let end = parse_time(rec.get(4).context("missing end_time")?)?;
            let schedule = WorkSchedule::new(days, start, end)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid work hours for handle {handle}"))?;
            person.schedule = Some(schedule);
        }

        if let Some(flag) = rec.get(5) {
            let flag = flag.trim();
            if !flag.is_empty() {
                person.active = parse_bool(flag)
                    .with_context(|| format!("invalid active value for handle {handle}"))?;
            }
        }
        out.push(person);
    }
    Ok(out)
}

/// Import de congés: header `handle,start_date,end_date[,start_time,end_time][,status]`
///
/// Statut absent = `approved`.
pub fn import_leaves_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<(String, LeaveInterval)>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).flexible(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        if handle.is_empty() {
            bail!("invalid leave row (empty handle)");
        }
        let start = parse_date(rec.get(1).context("missing start_date")?)?;
        let end = parse_date(rec.get(2).context("missing end_date")?)?;
        let start_time = parse_optional_time(rec.get(3))?;
        let end_time = parse_optional_time(rec.get(4))?;
        let status = match rec.get(5).map(str::trim) {
            Some(s) if !s.is_empty() => s.parse::<LeaveStatus>().map_err(anyhow::Error::msg)?,
            _ => LeaveStatus::Approved,
        };
        let leave = LeaveInterval::new(start, end, status)
            .and_then(|l| l.with_times(start_time, end_time))
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid leave for handle {handle}"))?;
        out.push((handle.to_string(), leave));
    }
    Ok(out)
}

/// `mon-fri`, `mon;wed;fri`, `1-5`, `sat|sun`…
pub fn parse_days(raw: &str) -> anyhow::Result<[bool; 7]> {
    let mut days = [false; 7];
    for chunk in raw.split([';', '|', ' ']).map(str::trim).filter(|c| !c.is_empty()) {
        if let Some((from, to)) = chunk.split_once('-') {
            let from = parse_day(from)?;
            let to = parse_day(to)?;
            if to < from {
                bail!("day range must go forward: {chunk}");
            }
            for d in from..=to {
                days[d] = true;
            }
        } else {
            days[parse_day(chunk)?] = true;
        }
    }
    if !days.iter().any(|d| *d) {
        bail!("no workday given");
    }
    Ok(days)
}

fn parse_day(raw: &str) -> anyhow::Result<usize> {
    let idx = match raw.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday" | "lun" | "1" => 0,
        "tue" | "tuesday" | "mar" | "2" => 1,
        "wed" | "wednesday" | "mer" | "3" => 2,
        "thu" | "thursday" | "jeu" | "4" => 3,
        "fri" | "friday" | "ven" | "5" => 4,
        "sat" | "saturday" | "sam" | "6" => 5,
        "sun" | "sunday" | "dim" | "7" => 6,
        other => bail!("unknown day: {other}"),
    };
    Ok(idx)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

pub fn parse_time(raw: &str) -> anyhow::Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time (HH:MM): {raw}"))
}

fn parse_optional_time(raw: Option<&str>) -> anyhow::Result<Option<NaiveTime>> {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => parse_time(s).map(Some),
        _ => Ok(None),
    }
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Heure locale `YYYY-MM-DDTHH:MM[:SS]` (espace accepté à la place du `T`).
pub fn parse_datetime(raw: &str) -> anyhow::Result<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .with_context(|| format!("invalid local datetime: {raw}"))
}

/// Export JSON de l'équipe (jolie mise en forme)
pub fn export_team_json<P: AsRef<Path>>(path: P, team: &Team) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(team)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des relances: header `id,lead,salesperson,due_at,status,escalation_level`
pub fn export_follow_ups_csv<P: AsRef<Path>>(path: P, team: &Team) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "lead", "salesperson", "due_at", "status", "escalation_level"])?;
    for f in &team.follow_ups {
        let handle = team.handle_of(&f.salesperson).unwrap_or("");
        let due = f.due_at.format("%Y-%m-%dT%H:%M:%S").to_string();
        let level = f.escalation_level.to_string();
        w.write_record([
            f.id.as_str(),
            f.lead.as_str(),
            handle,
            due.as_str(),
            f.status.as_str(),
            level.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_ranges_and_lists() {
        assert_eq!(parse_days("mon-fri").unwrap(), [true, true, true, true, true, false, false]);
        assert_eq!(parse_days("mon;wed;fri").unwrap(), [true, false, true, false, true, false, false]);
        assert_eq!(parse_days("6-7").unwrap(), [false, false, false, false, false, true, true]);
        assert!(parse_days("fri-mon").is_err());
        assert!(parse_days("funday").is_err());
    }

    #[test]
    fn datetime_accepts_minutes_precision() {
        let dt = parse_datetime("2025-03-04T14:00").unwrap();
        assert_eq!(dt, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap().and_hms_opt(14, 0, 0).unwrap());
        assert!(parse_datetime("2025-03-04").is_err());
    }
}
