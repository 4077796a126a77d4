use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use uuid::Uuid;

use crate::{PGPool, models::{DigestFrequency, EmailQueueEntry, Event}, db};

use super::{email::{self, Mailer}, ranking::{self, EventWithTags}};

/// How many personalized picks make it into one digest.
const MAX_PICKS: usize = 5;
/// Accepted events this far ahead appear in the reminder section.
const REMINDER_WINDOW_DAYS: i64 = 7;
/// Reminders starting within this window additionally get an urgent
/// in-app notification.
const URGENT_WINDOW_HOURS: i64 = 24;

/// Drains the pending queue for every user subscribed to the given
/// frequency. One user's failure is logged and never aborts the batch;
/// queue rows are only consumed after a successful send, so a crashed or
/// failed run is retried by the next trigger (at-least-once).
pub async fn process(
    frequency: DigestFrequency,
    mailer: &dyn Mailer,
    pool: &PGPool
) -> Result<(), sqlx::Error> {
    let rows = db::email_queue::pending_for_frequency(frequency, pool).await?;
    let grouped = group_by_user(rows);
    info!("{:?} digest run: {} users pending", frequency, grouped.len());
    for (user_id, event_ids) in grouped {
        if let Err(err) = process_user(user_id, &event_ids, mailer, pool).await {
            error!("digest for user {} failed: {:?}", user_id, err);
        }
    }
    Ok(())
}

fn group_by_user(rows: Vec<EmailQueueEntry>) -> BTreeMap<Uuid, Vec<Uuid>> {
    let mut grouped: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.user_id).or_default().push(row.event_id);
    }
    grouped
}

/// Reminders that start within the urgent window, soonest first.
fn urgent_reminders(reminders: &[Event], now: DateTime<Utc>) -> Vec<&Event> {
    reminders
        .iter()
        .filter(|event| event.dt >= now && event.dt - now <= Duration::hours(URGENT_WINDOW_HOURS))
        .collect()
}

/// The notification text doubles as the dedup key, so it must come out
/// identical across repeated runs for the same event.
fn urgent_reminder_content(event: &Event) -> String {
    format!(
        "'{}' starts at {}",
        event.title,
        event.dt.format("%Y-%m-%d %H:%M UTC")
    )
}

async fn process_user(
    user_id: Uuid,
    queued_event_ids: &[Uuid],
    mailer: &dyn Mailer,
    pool: &PGPool
) -> Result<(), sqlx::Error> {
    let user = db::user::get_by_id(user_id, pool).await?;
    let interests: HashSet<String> = db::user::tag_preferences(user_id, pool)
        .await?
        .into_iter()
        .collect();

    let now = Utc::now();
    // past events silently drop off the digest
    let upcoming = db::event::get_upcoming_by_ids(queued_event_ids, now, pool).await?;
    let mut candidates = Vec::with_capacity(upcoming.len());
    for event in upcoming {
        let tags = db::event::get_tags(event.id, pool).await?;
        candidates.push(EventWithTags { event, tags });
    }
    let mut picks = ranking::rank(candidates, &interests);
    picks.truncate(MAX_PICKS);

    // reminders come from accepted RSVPs, independent of the queue
    let reminders = db::rsvp::accepted_events_between(
        user_id,
        now,
        now + Duration::days(REMINDER_WINDOW_DAYS),
        pool
    ).await?;

    for event in urgent_reminders(&reminders, now) {
        let content = urgent_reminder_content(event);
        match db::notification::exists_unseen(user_id, event.id, &content, pool).await {
            Ok(true) => {}
            Ok(false) => {
                if let Err(err) = db::notification::insert(
                    user_id,
                    Some(event.id),
                    None,
                    &content,
                    pool
                ).await {
                    warn!("urgent reminder for event {} failed: {:?}", event.id, err);
                }
            }
            Err(err) => warn!("reminder dedup check for event {} failed: {:?}", event.id, err)
        }
    }

    let Some(address) = &user.email else {
        // nothing to deliver to; dropping the rows beats retrying forever
        warn!("user {} has no email address, dropping {} queue rows", user_id, queued_event_ids.len());
        db::email_queue::delete_consumed(user_id, queued_event_ids, pool).await?;
        return Ok(());
    };

    let (subject, body) = email::digest_email(&user.username, &picks, &reminders);
    match mailer.send(address, &subject, &body) {
        Ok(()) => {
            db::email_queue::delete_consumed(user_id, queued_event_ids, pool).await?;
        }
        Err(err) => {
            // rows stay pending for the next scheduled run
            warn!("digest email to {} failed: {:?}", address, err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;

    fn event_at(dt: DateTime<Utc>) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Garden party".to_string(),
            descr: String::new(),
            dt,
            place: None,
            address: None,
            max_attendees: None,
            number_of_attendees: 0,
            status: EventStatus::Active,
            creator: Uuid::new_v4(),
            created_at: Utc::now()
        }
    }

    fn pending(user_id: Uuid, event_id: Uuid) -> EmailQueueEntry {
        EmailQueueEntry {
            user_id,
            event_id,
            status: "pending".to_string(),
            created_at: Utc::now()
        }
    }

    #[test]
    fn grouping_collects_event_ids_per_user() {
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let (e1, e2, e3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let grouped = group_by_user(vec![
            pending(user_a, e1),
            pending(user_b, e2),
            pending(user_a, e3),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&user_a], vec![e1, e3]);
        assert_eq!(grouped[&user_b], vec![e2]);
    }

    #[test]
    fn no_pending_rows_means_no_users() {
        assert!(group_by_user(Vec::new()).is_empty());
    }

    #[test]
    fn urgent_window_is_twenty_four_hours() {
        let now = Utc::now();
        let in_12h = event_at(now + Duration::hours(12));
        let in_30h = event_at(now + Duration::hours(30));
        let started = event_at(now - Duration::hours(1));
        let reminders = vec![in_12h.clone(), in_30h, started];
        let urgent = urgent_reminders(&reminders, now);
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].id, in_12h.id);
    }

    #[test]
    fn reminder_content_is_stable_across_runs() {
        let event = event_at(Utc::now() + Duration::hours(3));
        assert_eq!(urgent_reminder_content(&event), urgent_reminder_content(&event));
    }
}
