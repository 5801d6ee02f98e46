#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use relance::{
    config::Settings,
    followup::FollowUpService,
    io,
    model::{delay_from_minutes, FollowUpId, Team, WorkSchedule, MAX_DELAY_MINUTES},
    notification::{prepare_notice, TextNotice},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des relances commerciales (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'équipe
    #[arg(long, global = true, default_value = "team.json")]
    team: String,

    /// Réglages JSON (horizon, escalade…)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Instant courant, heure locale `YYYY-MM-DDTHH:MM` (défaut : horloge système)
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des vendeurs depuis un CSV
    ImportSalespeople {
        #[arg(long)]
        csv: String,
    },

    /// Importer des congés depuis un CSV
    ImportLeaves {
        #[arg(long)]
        csv: String,
    },

    /// Définir les horaires d'un vendeur
    SetSchedule {
        #[arg(long)]
        handle: String,
        /// ex. "mon-fri" ou "mon;wed;fri"
        #[arg(long)]
        days: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
    },

    /// Calculer une échéance sans l'enregistrer
    Due {
        #[arg(long)]
        handle: Option<String>,
        /// Instant de référence (défaut : maintenant)
        #[arg(long)]
        base: Option<String>,
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=MAX_DELAY_MINUTES))]
        delay_minutes: i64,
    },

    /// Créer une relance
    Create {
        #[arg(long)]
        lead: String,
        #[arg(long)]
        handle: String,
        #[arg(long)]
        base: Option<String>,
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=MAX_DELAY_MINUTES))]
        delay_minutes: i64,
    },

    /// Marquer une relance comme faite
    Complete {
        #[arg(long)]
        id: String,
    },

    /// Lister et optionnellement exporter
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Lister les relances en retard
    Overdue {
        /// Export CSV des retards (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Faire monter d'un palier les relances trop en retard
    Escalate,

    /// Réattribuer une relance à un autre vendeur
    Reassign {
        #[arg(long)]
        id: String,
        #[arg(long)]
        to: String,
    },

    /// Réattribuer les relances ayant atteint le palier configuré
    ReassignOverdue,

    /// Recalculer les échéances d'un vendeur
    Reschedule {
        #[arg(long)]
        handle: String,
    },

    /// Générer l'avis texte d'une relance en retard
    Notify {
        #[arg(long)]
        id: String,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let now: NaiveDateTime = match &cli.now {
        Some(raw) => io::parse_datetime(raw)?,
        None => Local::now().naive_local(),
    };

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let storage = JsonStorage::open(&cli.team)?;
    let team = if storage.exists() { storage.load()? } else { Team::default() };
    let mut service = FollowUpService::new(team, settings);

    let code = match cli.cmd {
        Commands::ImportSalespeople { csv } => {
            let people = io::import_salespeople_csv(csv)?;
            service.add_salespeople(people)?;
            storage.save(service.team())?;
            0
        }
        Commands::ImportLeaves { csv } => {
            let leaves = io::import_leaves_csv(csv)?;
            let mut moved = 0usize;
            for (handle, leave) in leaves {
                moved += service.add_leave(&handle, leave, now)?;
            }
            storage.save(service.team())?;
            println!("{moved} follow-up(s) rescheduled");
            0
        }
        Commands::SetSchedule { handle, days, start, end } => {
            let schedule = WorkSchedule::new(
                io::parse_days(&days)?,
                io::parse_time(&start)?,
                io::parse_time(&end)?,
            )
            .map_err(anyhow::Error::msg)?;
            let moved = service.set_schedule(&handle, schedule, now)?;
            storage.save(service.team())?;
            println!("{moved} follow-up(s) rescheduled");
            0
        }
        Commands::Due { handle, base, delay_minutes } => {
            let person = match handle {
                Some(h) => Some(
                    service
                        .team()
                        .find_by_handle(&h)
                        .map(|p| p.id.clone())
                        .ok_or_else(|| anyhow::anyhow!("unknown salesperson: {}", h))?,
                ),
                None => None,
            };
            let base = parse_base(base.as_deref(), now)?;
            let delay = delay_from_minutes(delay_minutes).context("delay out of range")?;
            let due = service.plan_due_date(person.as_ref(), base, delay, now);
            println!("{} {}", due.at.format("%Y-%m-%dT%H:%M:%S"), due.outcome.as_str());
            0
        }
        Commands::Create { lead, handle, base, delay_minutes } => {
            let base = parse_base(base.as_deref(), now)?;
            let delay = delay_from_minutes(delay_minutes).context("delay out of range")?;
            let id = service.create_follow_up(&lead, &handle, base, delay, now)?;
            storage.save(service.team())?;
            let due = service
                .team()
                .find_follow_up(&id)
                .map(|f| f.due_at)
                .context("follow-up vanished after creation")?;
            println!("{} {}", id.as_str(), due.format("%Y-%m-%dT%H:%M:%S"));
            0
        }
        Commands::Complete { id } => {
            service.complete(&FollowUpId::new(id), now)?;
            storage.save(service.team())?;
            0
        }
        Commands::List { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_team_json(path, service.team())?;
            }
            if let Some(path) = out_csv {
                io::export_follow_ups_csv(path, service.team())?;
            }
            // impression compacte
            let team = service.team();
            for f in &team.follow_ups {
                println!(
                    "{} | {} | {} | {} | {}",
                    f.id.as_str(),
                    f.lead,
                    team.handle_of(&f.salesperson).unwrap_or("-"),
                    f.due_at.format("%Y-%m-%dT%H:%M"),
                    f.status.as_str()
                );
            }
            0
        }
        Commands::Overdue { report } => {
            let entries = service.overdue(now);
            if entries.is_empty() {
                println!("OK: no overdue follow-up");
                0
            } else {
                eprintln!("Found {} overdue follow-up(s)", entries.len());
                let team = service.team();
                for e in &entries {
                    println!(
                        "{} | {} | {} | {} min | level {}",
                        e.follow_up.as_str(),
                        team.handle_of(&e.salesperson).unwrap_or("-"),
                        e.due_at.format("%Y-%m-%dT%H:%M"),
                        e.minutes_overdue,
                        e.escalation_level
                    );
                }
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["follow_up", "salesperson", "due_at", "minutes_overdue", "level"])?;
                    for e in &entries {
                        w.write_record([
                            e.follow_up.as_str().to_string(),
                            team.handle_of(&e.salesperson).unwrap_or("").to_string(),
                            e.due_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
                            e.minutes_overdue.to_string(),
                            e.escalation_level.to_string(),
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/OVERDUE
                2
            }
        }
        Commands::Escalate => {
            let escalated = service.escalate(now);
            for e in &escalated {
                println!("{} -> level {}", e.follow_up.as_str(), e.level);
            }
            storage.save(service.team())?;
            0
        }
        Commands::Reassign { id, to } => {
            let moved = service.reassign(&FollowUpId::new(id), &to, now)?;
            storage.save(service.team())?;
            println!("{} {}", moved.follow_up.as_str(), moved.due_at.format("%Y-%m-%dT%H:%M:%S"));
            0
        }
        Commands::ReassignOverdue => {
            let moved = service.reassign_overdue(now);
            let team = service.team();
            for r in &moved {
                println!(
                    "{} | {} -> {} | {}",
                    r.follow_up.as_str(),
                    team.handle_of(&r.from).unwrap_or("-"),
                    team.handle_of(&r.to).unwrap_or("-"),
                    r.due_at.format("%Y-%m-%dT%H:%M")
                );
            }
            storage.save(service.team())?;
            0
        }
        Commands::Reschedule { handle } => {
            let id = service
                .team()
                .find_by_handle(&handle)
                .map(|p| p.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown salesperson: {}", handle))?;
            let moved = service.reschedule_for(&id, now);
            storage.save(service.team())?;
            println!("{moved} follow-up(s) rescheduled");
            0
        }
        Commands::Notify { id, out } => {
            let renderer = TextNotice;
            let notice = prepare_notice(service.team(), &FollowUpId::new(id), now, &renderer)?;
            std::fs::write(&out, notice.content)?;
            println!(
                "Notice generated for {} (follow-up {}) at {}",
                notice.salesperson_handle,
                notice.follow_up_id,
                notice.generated_at.format("%Y-%m-%dT%H:%M")
            );
            0
        }
    };

    std::process::exit(code);
}

fn parse_base(raw: Option<&str>, now: NaiveDateTime) -> Result<NaiveDateTime> {
    raw.map_or(Ok(now), io::parse_datetime)
}
