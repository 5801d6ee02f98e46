use crate::model::MAX_DELAY_MINUTES;
use crate::scheduler::ScheduleOptions;
use anyhow::{bail, Context};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Horizon de recherche maximal (une dizaine d'années).
pub const MAX_HORIZON_DAYS: u32 = 3660;
const MAX_ESCALATE_HOURS: i64 = MAX_DELAY_MINUTES / 60;

/// Réglages du calcul d'échéance et de la politique d'escalade.
///
/// Fichier JSON optionnel ; chaque champ absent prend sa valeur par défaut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search_horizon_days: u32,
    pub short_delay_minutes: i64,
    /// Retard (heures) déclenchant chaque palier d'escalade.
    pub escalate_after_hours: i64,
    /// Palier à partir duquel une relance est réattribuée automatiquement.
    pub reassign_after_level: u8,
    /// Délai appliqué à partir de la réattribution.
    pub reassign_delay_minutes: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_horizon_days: 30,
            short_delay_minutes: 60,
            escalate_after_hours: 24,
            reassign_after_level: 2,
            reassign_delay_minutes: 0,
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_json::from_slice(&data)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_HORIZON_DAYS).contains(&self.search_horizon_days) {
            bail!("search_horizon_days must be between 1 and {MAX_HORIZON_DAYS}");
        }
        if !(0..=MAX_DELAY_MINUTES).contains(&self.short_delay_minutes) {
            bail!("short_delay_minutes must be between 0 and {MAX_DELAY_MINUTES}");
        }
        if !(1..=MAX_ESCALATE_HOURS).contains(&self.escalate_after_hours) {
            bail!("escalate_after_hours must be between 1 and {MAX_ESCALATE_HOURS}");
        }
        if self.reassign_after_level == 0 {
            bail!("reassign_after_level must be > 0");
        }
        if !(0..=MAX_DELAY_MINUTES).contains(&self.reassign_delay_minutes) {
            bail!("reassign_delay_minutes must be between 0 and {MAX_DELAY_MINUTES}");
        }
        Ok(())
    }

    // Les accesseurs ci-dessous bornent les valeurs : des réglages construits
    // à la main sans `validate` ne doivent pas faire paniquer chrono.

    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            horizon_days: self.search_horizon_days.clamp(1, MAX_HORIZON_DAYS),
            short_delay: Duration::minutes(self.short_delay_minutes.clamp(0, MAX_DELAY_MINUTES)),
        }
    }

    /// Retard supplémentaire exigé par chaque palier d'escalade.
    pub fn escalation_step(&self) -> Duration {
        Duration::hours(self.escalate_after_hours.clamp(1, MAX_ESCALATE_HOURS))
    }

    pub fn reassign_delay(&self) -> Duration {
        Duration::minutes(self.reassign_delay_minutes.clamp(0, MAX_DELAY_MINUTES))
    }
}
