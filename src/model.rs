use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Délai maximal d'une relance (dix ans).
pub const MAX_DELAY_MINUTES: i64 = 10 * 366 * 24 * 60;

/// Délai en minutes, `None` s'il est négatif ou dépasse [`MAX_DELAY_MINUTES`].
pub fn delay_from_minutes(minutes: i64) -> Option<Duration> {
    (0..=MAX_DELAY_MINUTES)
        .contains(&minutes)
        .then(|| Duration::minutes(minutes))
}

/// Identifiant fort pour Salesperson
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalespersonId(String);

impl SalespersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Horaires hebdomadaires d'un vendeur (heure locale, sans fuseau).
///
/// `days[0]` = lundi … `days[6]` = dimanche.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    pub days: [bool; 7],
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl WorkSchedule {
    /// Crée des horaires en validant que `end_time > start_time`.
    pub fn new(days: [bool; 7], start_time: NaiveTime, end_time: NaiveTime) -> Result<Self, String> {
        if end_time <= start_time {
            return Err("work end_time must be after start_time".to_string());
        }
        Ok(Self { days, start_time, end_time })
    }

    /// Lundi → vendredi, mêmes heures chaque jour.
    pub fn weekdays(start_time: NaiveTime, end_time: NaiveTime) -> Result<Self, String> {
        Self::new([true, true, true, true, true, false, false], start_time, end_time)
    }

    pub fn works_on(&self, weekday: Weekday) -> bool {
        self.days[weekday.num_days_from_monday() as usize]
    }

    /// Bornes incluses.
    pub fn covers(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    /// Horaires exploitables : au moins un jour travaillé et une plage non vide.
    pub fn is_configured(&self) -> bool {
        self.days.iter().any(|d| *d) && self.start_time < self.end_time
    }

    pub fn work_start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start_time)
    }

    pub fn is_work_moment(&self, at: NaiveDateTime) -> bool {
        self.works_on(at.weekday()) && self.covers(at.time())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::str::FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(LeaveStatus::Approved),
            "pending" => Ok(LeaveStatus::Pending),
            "rejected" => Ok(LeaveStatus::Rejected),
            _ => Err(format!("invalid leave status: {s}")),
        }
    }
}

/// Congé : plage de dates incluses, éventuellement restreinte à une plage horaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInterval {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub status: LeaveStatus,
}

impl LeaveInterval {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, status: LeaveStatus) -> Result<Self, String> {
        if end_date < start_date {
            return Err("leave end_date must not be before start_date".to_string());
        }
        Ok(Self { start_date, end_date, start_time: None, end_time: None, status })
    }

    /// Restreint le congé à une plage horaire quotidienne.
    pub fn with_times(mut self, start_time: Option<NaiveTime>, end_time: Option<NaiveTime>) -> Result<Self, String> {
        if let (Some(s), Some(e)) = (start_time, end_time) {
            if e <= s {
                return Err("leave end_time must be after start_time".to_string());
            }
        }
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(self)
    }

    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Sans bornes horaires, le congé bloque la journée entière.
    pub fn blocks(&self, at: NaiveDateTime) -> bool {
        if !self.is_approved() {
            return false;
        }
        let date = at.date();
        if date < self.start_date || date > self.end_date {
            return false;
        }
        let time = at.time();
        let after_start = self.start_time.map_or(true, |s| time >= s);
        let before_end = self.end_time.map_or(true, |e| time <= e);
        after_start && before_end
    }
}

/// Vendeur
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salesperson {
    pub id: SalespersonId,
    pub handle: String,
    pub display_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<WorkSchedule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leaves: Vec<LeaveInterval>,
}

fn default_active() -> bool {
    true
}

impl Salesperson {
    pub fn new<H: Into<String>, D: Into<String>>(handle: H, display_name: D) -> Self {
        Self {
            id: SalespersonId::random(),
            handle: handle.into(),
            display_name: display_name.into(),
            active: true,
            schedule: None,
            leaves: Vec::new(),
        }
    }

    pub fn with_schedule(mut self, schedule: WorkSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Horaires exploitables par le calcul d'échéance, s'il y en a.
    pub fn work_schedule(&self) -> Option<&WorkSchedule> {
        self.schedule.as_ref().filter(|s| s.is_configured())
    }
}

/// Identifiant fort pour FollowUp
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowUpId(String);

impl FollowUpId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    #[default]
    Pending,
    Done,
}

impl FollowUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpStatus::Pending => "pending",
            FollowUpStatus::Done => "done",
        }
    }
}

/// Relance à effectuer sur un prospect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: FollowUpId,
    pub lead: String,
    pub salesperson: SalespersonId,
    pub base_time: NaiveDateTime,
    pub delay_minutes: i64,
    pub due_at: NaiveDateTime,
    #[serde(default)]
    pub status: FollowUpStatus,
    #[serde(default)]
    pub escalation_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reassigned_from: Option<SalespersonId>,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

impl FollowUp {
    pub fn is_pending(&self) -> bool {
        self.status == FollowUpStatus::Pending
    }

    pub fn delay(&self) -> Duration {
        Duration::minutes(self.delay_minutes.clamp(0, MAX_DELAY_MINUTES))
    }
}

/// Équipe commerciale complète
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Team {
    pub salespeople: Vec<Salesperson>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,
}

impl Team {
    /// Handles uniques, délais des relances dans les bornes.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for p in &self.salespeople {
            if !seen.insert(p.handle.as_str()) {
                return Err(format!("duplicate salesperson handle: {}", p.handle));
            }
        }
        for f in &self.follow_ups {
            if delay_from_minutes(f.delay_minutes).is_none() {
                return Err(format!("follow-up {} has an out-of-range delay", f.id.as_str()));
            }
        }
        Ok(())
    }

    pub fn find_by_handle<'a>(&'a self, handle: &str) -> Option<&'a Salesperson> {
        self.salespeople.iter().find(|p| p.handle == handle)
    }
    pub fn find_by_id<'a>(&'a self, id: &SalespersonId) -> Option<&'a Salesperson> {
        self.salespeople.iter().find(|p| &p.id == id)
    }
    pub fn find_mut_by_handle(&mut self, handle: &str) -> Option<&mut Salesperson> {
        self.salespeople.iter_mut().find(|p| p.handle == handle)
    }
    pub fn find_follow_up(&self, id: &FollowUpId) -> Option<&FollowUp> {
        self.follow_ups.iter().find(|f| &f.id == id)
    }
    pub fn find_follow_up_mut(&mut self, id: &FollowUpId) -> Option<&mut FollowUp> {
        self.follow_ups.iter_mut().find(|f| &f.id == id)
    }
    pub fn handle_of(&self, id: &SalespersonId) -> Option<&str> {
        self.find_by_id(id).map(|p| p.handle.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn schedule_rejects_empty_window() {
        assert!(WorkSchedule::weekdays(t(18, 0), t(9, 0)).is_err());
        assert!(WorkSchedule::weekdays(t(9, 0), t(9, 0)).is_err());
    }

    #[test]
    fn time_bounded_leave_only_blocks_its_window() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let leave = LeaveInterval::new(day, day, LeaveStatus::Approved)
            .unwrap()
            .with_times(Some(t(13, 0)), Some(t(15, 0)))
            .unwrap();
        assert!(!leave.blocks(day.and_time(t(10, 0))));
        assert!(leave.blocks(day.and_time(t(13, 0))));
        assert!(leave.blocks(day.and_time(t(15, 0))));
        assert!(!leave.blocks(day.and_time(t(15, 1))));
    }

    #[test]
    fn pending_leave_never_blocks() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let leave = LeaveInterval::new(day, day, LeaveStatus::Pending).unwrap();
        assert!(!leave.blocks(day.and_time(t(10, 0))));
    }

    #[test]
    fn delay_conversion_is_bounded() {
        assert_eq!(delay_from_minutes(90), Some(Duration::minutes(90)));
        assert_eq!(delay_from_minutes(-1), None);
        assert_eq!(delay_from_minutes(i64::MAX), None);
    }

    #[test]
    fn team_validation_catches_duplicates_and_huge_delays() {
        let mut team = Team::default();
        team.salespeople.push(Salesperson::new("alice", "Alice"));
        assert!(team.validate().is_ok());

        let mut f = FollowUp {
            id: FollowUpId::random(),
            lead: "lead".to_string(),
            salesperson: team.salespeople[0].id.clone(),
            base_time: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap().and_time(t(10, 0)),
            delay_minutes: i64::MAX,
            due_at: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap().and_time(t(10, 0)),
            status: FollowUpStatus::Pending,
            escalation_level: 0,
            reassigned_from: None,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap().and_time(t(10, 0)),
            completed_at: None,
        };
        // clampé, pas de panique
        assert_eq!(f.delay(), Duration::minutes(MAX_DELAY_MINUTES));
        team.follow_ups.push(f.clone());
        assert!(team.validate().unwrap_err().contains("out-of-range delay"));

        f.delay_minutes = 30;
        team.follow_ups = vec![f];
        team.salespeople.push(Salesperson::new("alice", "Alice bis"));
        assert_eq!(team.validate().unwrap_err(), "duplicate salesperson handle: alice");
    }
}
