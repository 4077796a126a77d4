use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{models::{Event, Rsvp, RsvpStatus}, PGPool};

pub async fn get(event_id: Uuid, user_id: Uuid, pool: &PGPool) -> Result<Option<Rsvp>, sqlx::Error> {
    sqlx::query_as::<_, Rsvp>("SELECT * FROM rsvps WHERE event_id = $1 AND user_id = $2")
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// A new response replaces the old one, no history is kept.
pub async fn upsert(event_id: Uuid, user_id: Uuid, status: RsvpStatus, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO rsvps (event_id, user_id, status, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (event_id, user_id)
        DO UPDATE SET status = EXCLUDED.status, updated_at = EXCLUDED.updated_at")
    .bind(event_id)
    .bind(user_id)
    .bind(status)
    .bind(Utc::now())
    .execute(pool)
    .await;
    match res {
        Ok(val) => Ok(val.rows_affected()),
        Err(err) => Err(err)
    }
}

pub async fn accepted_count(event_id: Uuid, pool: &PGPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM rsvps WHERE event_id = $1 AND status = 'accepted'")
    .bind(event_id)
    .fetch_one(pool)
    .await
}

/// Events the user accepted with a start time inside the given window.
pub async fn accepted_events_between(
    user_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    pool: &PGPool
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "SELECT e.* FROM events e
        JOIN rsvps r ON r.event_id = e.id
        WHERE r.user_id = $1 AND r.status = 'accepted' AND e.dt >= $2 AND e.dt < $3
        ORDER BY e.dt")
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}
