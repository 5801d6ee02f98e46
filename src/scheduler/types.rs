use crate::model::Salesperson;
use chrono::{Duration, NaiveDateTime};

/// Options du calcul d'échéance
#[derive(Debug, Clone, Copy)]
pub struct ScheduleOptions {
    /// Nombre de jours calendaires inspectés par la recherche.
    pub horizon_days: u32,
    /// En dessous de ce délai, une demande faite pendant les heures de travail
    /// du jour même est traitée immédiatement.
    pub short_delay: Duration,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            short_delay: Duration::hours(1),
        }
    }
}

/// Demande de calcul : vendeur éventuel, instant de référence et délai voulu.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleRequest<'a> {
    pub salesperson: Option<&'a Salesperson>,
    pub base_time: NaiveDateTime,
    pub delay: Duration,
}

impl<'a> ScheduleRequest<'a> {
    pub fn new(salesperson: Option<&'a Salesperson>, base_time: NaiveDateTime, delay: Duration) -> Self {
        Self { salesperson, base_time, delay }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Pas d'horaires exploitables (ou vendeur absent/inactif) : aucun ajustement.
    Unadjusted,
    /// L'instant demandé respecte déjà horaires et congés.
    InWindow,
    /// Reporté au début de la prochaine journée travaillée.
    NextWorkday,
    /// Délai court demandé pendant les heures de travail du jour.
    Immediate,
    /// Aucun créneau trouvé dans l'horizon : `now + delay`.
    Fallback,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Unadjusted => "unadjusted",
            Outcome::InWindow => "in-window",
            Outcome::NextWorkday => "next-workday",
            Outcome::Immediate => "immediate",
            Outcome::Fallback => "fallback",
        }
    }
}

/// Échéance calculée et la manière dont elle a été obtenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDate {
    pub at: NaiveDateTime,
    pub outcome: Outcome,
}
