#![forbid(unsafe_code)]
//! Relance — bibliothèque de planification des relances commerciales (sans BD).
//!
//! - Échéances calées sur les jours et heures de travail de chaque vendeur.
//! - Congés approuvés (journée entière ou plage horaire) évités.
//! - Détection des retards, escalade par paliers, réattribution round-robin.
//! - Stockage fichiers (JSON/CSV) ; tout en heure locale, `now` toujours injecté.

pub mod config;
pub mod followup;
pub mod io;
pub mod leave;
pub mod model;
pub mod notification;
pub mod scheduler;
pub mod storage;

pub use config::Settings;
pub use followup::{Escalation, FollowUpError, FollowUpService, OverdueEntry, Reassignment};
pub use leave::LeaveCalendar;
pub use model::{
    FollowUp, FollowUpId, FollowUpStatus, LeaveInterval, LeaveStatus, Salesperson, SalespersonId,
    Team, WorkSchedule,
};
pub use notification::{prepare_notice, Notice, NoticeRenderer, TextNotice};
pub use scheduler::{DueDate, Outcome, ScheduleOptions, ScheduleRequest, WorkHoursScheduler};
pub use storage::{JsonStorage, Storage};
