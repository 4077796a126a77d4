use log::warn;
use uuid::Uuid;

use crate::{PGPool, models::{EventStatus, RsvpStatus}, errors::ApiError, db};

/// Upserts the (user, event) RSVP, refreshes the cached attendee count from
/// a fresh count query and notifies the author when the response changed.
pub async fn submit(
    event_id: Uuid,
    user_id: Uuid,
    status: RsvpStatus,
    pool: &PGPool
) -> Result<i64, ApiError> {
    let event = db::event::get_by_id(event_id, pool)
        .await
        .map_err(ApiError::from)?;
    if event.status == EventStatus::Canceled {
        return Err(ApiError::Conflict);
    }

    if status == RsvpStatus::Accepted {
        if let Some(max) = event.max_attendees {
            // admission check runs before the upsert and is not atomic
            // with it; concurrent double-submission can admit one over
            let accepted = db::rsvp::accepted_count(event_id, pool)
                .await
                .map_err(ApiError::from)?;
            if accepted >= max as i64 {
                return Err(ApiError::Capacity);
            }
        }
    }

    let previous = db::rsvp::get(event_id, user_id, pool)
        .await
        .map_err(ApiError::from)?;
    db::rsvp::upsert(event_id, user_id, status, pool)
        .await
        .map_err(ApiError::from)?;

    // the cache is always recomputed from a fresh count, never adjusted
    // in place
    let accepted_now = db::rsvp::accepted_count(event_id, pool)
        .await
        .map_err(ApiError::from)?;
    if let Err(err) = db::event::set_attendee_count(event_id, accepted_now as i32, pool).await {
        warn!("attendee count refresh failed for event {}: {:?}", event_id, err);
    }

    let changed = previous.map(|r| r.status) != Some(status);
    if changed {
        notify_author(&event, user_id, status, pool).await;
    }

    super::event::refresh_status_quiet(event_id, pool).await;
    Ok(accepted_now)
}

async fn notify_author(
    event: &crate::models::Event,
    responder: Uuid,
    status: RsvpStatus,
    pool: &PGPool
) {
    let username = match db::user::get_by_id(responder, pool).await {
        Ok(user) => user.username,
        Err(err) => {
            warn!("loading responder {} failed: {:?}", responder, err);
            return;
        }
    };
    let content = match status {
        RsvpStatus::Accepted => format!("{} is going to '{}'", username, event.title),
        RsvpStatus::Declined => format!("{} can no longer attend '{}'", username, event.title)
    };
    if let Err(err) = db::notification::insert(event.creator, Some(event.id), None, &content, pool).await {
        warn!("rsvp notification for event {} failed: {:?}", event.id, err);
    }
}
