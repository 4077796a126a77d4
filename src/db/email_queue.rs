use uuid::Uuid;

use crate::{models::{DigestFrequency, EmailQueueEntry}, PGPool};

/// One pending work row per (user, event); duplicates are ignored so a
/// re-enqueue for the same pair is a no-op. Runs as a single transaction.
pub async fn enqueue_many(event_id: Uuid, user_ids: &[Uuid], pool: &PGPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;
    for user_id in user_ids {
        let res = sqlx::query(
            "INSERT INTO email_queue (user_id, event_id, status)
            VALUES ($1, $2, 'pending')
            ON CONFLICT (user_id, event_id, status) DO NOTHING")
        .bind(user_id)
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
        inserted += res.rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}

/// Pending rows whose owner subscribed to the given digest frequency.
/// Grouping per user happens in the caller.
pub async fn pending_for_frequency(
    frequency: DigestFrequency,
    pool: &PGPool
) -> Result<Vec<EmailQueueEntry>, sqlx::Error> {
    sqlx::query_as::<_, EmailQueueEntry>(
        "SELECT q.* FROM email_queue q
        JOIN users u ON u.id = q.user_id
        WHERE q.status = 'pending' AND u.digest_frequency = $1
        ORDER BY q.user_id, q.created_at")
    .bind(frequency)
    .fetch_all(pool)
    .await
}

/// Consumes the rows that made it into a successfully sent digest.
pub async fn delete_consumed(user_id: Uuid, event_ids: &[Uuid], pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "DELETE FROM email_queue
        WHERE user_id = $1 AND event_id = ANY($2) AND status = 'pending'")
    .bind(user_id)
    .bind(event_ids)
    .execute(pool)
    .await;
    match res {
        Ok(val) => Ok(val.rows_affected()),
        Err(err) => Err(err)
    }
}
