use log::info;
use uuid::Uuid;

use crate::{PGPool, db};

/// Queues one pending digest row per interested user for this event.
/// Interested means verified, opted into notifications and sharing at least
/// one tag with the event; the author is excluded. Re-running for the same
/// event is idempotent.
pub async fn enqueue_digest_candidates(
    event_id: Uuid,
    author_id: Uuid,
    pool: &PGPool
) -> Result<u64, sqlx::Error> {
    let audience = db::user::digest_audience(event_id, author_id, pool).await?;
    if audience.is_empty() {
        return Ok(0);
    }
    let inserted = db::email_queue::enqueue_many(event_id, &audience, pool).await?;
    info!(
        "queued event {} for {} of {} interested users",
        event_id,
        inserted,
        audience.len()
    );
    Ok(inserted)
}
