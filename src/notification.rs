use crate::model::{FollowUp, FollowUpId, Salesperson, Team};
use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;

/// Représente un avis de relance en retard destiné à un vendeur.
#[derive(Debug, Clone)]
pub struct Notice {
    pub salesperson_handle: String,
    pub follow_up_id: String,
    pub generated_at: NaiveDateTime,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, messagerie, etc.).
pub trait NoticeRenderer {
    fn render(&self, person: &Salesperson, follow_up: &FollowUp, now: NaiveDateTime) -> String;
}

/// Gabarit texte simple destiné à une future messagerie.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotice;

impl NoticeRenderer for TextNotice {
    fn render(&self, person: &Salesperson, follow_up: &FollowUp, now: NaiveDateTime) -> String {
        let late = (now - follow_up.due_at).num_minutes().max(0);
        format!(
            "Hello {name},\n\nThe follow-up for lead \"{lead}\" was due on {due}.\nIt is now {hours}h{minutes:02} overdue (escalation level {level}).\n\nPlease contact the lead and mark the follow-up as done.\n",
            name = person.display_name,
            lead = follow_up.lead,
            due = follow_up.due_at.format("%Y-%m-%d %H:%M"),
            hours = late / 60,
            minutes = late % 60,
            level = follow_up.escalation_level,
        )
    }
}

/// Prépare l'avis pour une relance en attente et échue.
pub fn prepare_notice(
    team: &Team,
    id: &FollowUpId,
    now: NaiveDateTime,
    renderer: &dyn NoticeRenderer,
) -> Result<Notice> {
    let follow_up = team
        .find_follow_up(id)
        .with_context(|| format!("unknown follow-up: {}", id.as_str()))?;

    if !follow_up.is_pending() {
        bail!("follow-up {} is already done", id.as_str());
    }
    if follow_up.due_at >= now {
        bail!("follow-up {} is not overdue yet", id.as_str());
    }

    let person = team
        .find_by_id(&follow_up.salesperson)
        .with_context(|| format!("unknown salesperson: {}", follow_up.salesperson.as_str()))?;

    let content = renderer.render(person, follow_up, now);
    Ok(Notice {
        salesperson_handle: person.handle.clone(),
        follow_up_id: id.as_str().to_string(),
        generated_at: now,
        content,
    })
}
