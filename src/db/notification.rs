use chrono::Utc;
use uuid::Uuid;

use crate::{models::Notification, PGPool};

pub async fn insert(
    recipient: Uuid,
    event_id: Option<Uuid>,
    invitation_id: Option<Uuid>,
    content: &str,
    pool: &PGPool
) -> Result<Uuid, sqlx::Error> {
    let notification_id = Uuid::new_v4();
    let now = Utc::now();
    let res = sqlx::query(
        "INSERT INTO notifications (id, recipient, event_id, invitation_id, content, seen, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6, $6)")
    .bind(notification_id)
    .bind(recipient)
    .bind(event_id)
    .bind(invitation_id)
    .bind(content)
    .bind(now)
    .execute(pool)
    .await;
    match res {
        Ok(_) => Ok(notification_id),
        Err(err) => Err(err)
    }
}

/// Re-notifying about the same event while the previous notification is
/// still unseen overwrites it in place instead of piling up rows.
pub async fn upsert_unseen(
    recipient: Uuid,
    event_id: Uuid,
    content: &str,
    pool: &PGPool
) -> Result<Uuid, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE notifications SET content = $1, updated_at = $2
        WHERE recipient = $3 AND event_id = $4 AND seen = FALSE")
    .bind(content)
    .bind(Utc::now())
    .bind(recipient)
    .bind(event_id)
    .execute(pool)
    .await?;
    if updated.rows_affected() > 0 {
        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM notifications WHERE recipient = $1 AND event_id = $2 AND seen = FALSE")
        .bind(recipient)
        .bind(event_id)
        .fetch_one(pool)
        .await?;
        return Ok(existing);
    }
    insert(recipient, Some(event_id), None, content, pool).await
}

pub async fn exists_unseen(
    recipient: Uuid,
    event_id: Uuid,
    content: &str,
    pool: &PGPool
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications
        WHERE recipient = $1 AND event_id = $2 AND content = $3 AND seen = FALSE")
    .bind(recipient)
    .bind(event_id)
    .bind(content)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn list_for_user(user_id: Uuid, pool: &PGPool) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE recipient = $1 ORDER BY created_at DESC")
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Notification, sqlx::Error> {
    sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn mark_seen(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE notifications SET seen = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await;
    match res {
        Ok(val) => Ok(val.rows_affected()),
        Err(err) => Err(err)
    }
}
