use sqlx;
use uuid::Uuid;

use crate::{models::{Invitation, InviteStatus}, PGPool};

pub async fn create(invitation: Invitation, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO invitations (id, event_id, user_id, inviter, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)")
    .bind(invitation.id)
    .bind(invitation.event_id)
    .bind(invitation.user_id)
    .bind(invitation.inviter)
    .bind(invitation.status)
    .bind(invitation.created_at)
    .execute(pool)
    .await;
    match res {
        Ok(val) => Ok(val.rows_affected()),
        Err(err) => Err(err)
    }
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Invitation, sqlx::Error> {
    sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// A declined invitation keeps its row, so existence covers it too.
pub async fn exists(event_id: Uuid, user_id: Uuid, pool: &PGPool) -> bool {
    let res = sqlx::query_as::<_, Invitation>(
        "SELECT * FROM invitations WHERE event_id = $1 AND user_id = $2")
    .bind(event_id)
    .bind(user_id)
    .fetch_one(pool)
    .await;
    match res {
        Ok(_) => true,
        Err(_) => false
    }
}

pub async fn set_status(id: Uuid, status: Option<InviteStatus>, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE invitations SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await;
    match res {
        Ok(val) => Ok(val.rows_affected()),
        Err(err) => Err(err)
    }
}
