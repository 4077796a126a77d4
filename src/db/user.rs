use uuid::Uuid;

use crate::{models::User, PGPool};

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Resolves a username or an email address, case-insensitively.
pub async fn find_by_identifier(identifier: &str, pool: &PGPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE lower(username) = lower($1) OR lower(email) = lower($1)")
    .bind(identifier)
    .fetch_optional(pool)
    .await
}

pub async fn tag_preferences(id: Uuid, pool: &PGPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT tag FROM user_tags WHERE user_id = $1")
        .bind(id)
        .fetch_all(pool)
        .await
}

/// Verified, notification-opted-in users whose tag preferences intersect the
/// event's tags, excluding the author.
pub async fn digest_audience(event_id: Uuid, author_id: Uuid, pool: &PGPool) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT DISTINCT u.id FROM users u
        JOIN user_tags ut ON ut.user_id = u.id
        WHERE ut.tag IN (SELECT tag FROM event_tags WHERE event_id = $1)
        AND u.verified = TRUE
        AND u.allow_notifications = TRUE
        AND u.id <> $2")
    .bind(event_id)
    .bind(author_id)
    .fetch_all(pool)
    .await
}
