use chrono::{DateTime, Utc};
use sqlx::{postgres::PgQueryResult, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{models::{Event, EventStatus, User}, PGPool, dto::EventField};

pub async fn create(event: Event, pool: &PGPool) -> Result<PgQueryResult, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO events (id, title, descr, dt, place, address, max_attendees, number_of_attendees, status, creator, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)")
    .bind(event.id)
    .bind(event.title)
    .bind(event.descr)
    .bind(event.dt)
    .bind(event.place)
    .bind(event.address)
    .bind(event.max_attendees)
    .bind(event.number_of_attendees)
    .bind(event.status)
    .bind(event.creator)
    .bind(event.created_at)
    .execute(pool)
    .await;
    match res {
        Ok(v) => Ok(v),
        Err(err) => Err(err)
    }
}

// /events/id
pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn get_all(pool: &PGPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY dt")
        .fetch_all(pool)
        .await
}

pub async fn get_by_creator(creator: Uuid, pool: &PGPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE creator = $1 ORDER BY dt")
        .bind(creator)
        .fetch_all(pool)
        .await
}

/// Events still in the future among the given ids, for the digest body.
pub async fn get_upcoming_by_ids(
    ids: &[Uuid],
    now: DateTime<Utc>,
    pool: &PGPool
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ANY($1) AND dt > $2")
        .bind(ids)
        .bind(now)
        .fetch_all(pool)
        .await
}

pub async fn get_tags(id: Uuid, pool: &PGPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT tag FROM event_tags WHERE event_id = $1")
        .bind(id)
        .fetch_all(pool)
        .await
}

pub async fn replace_tags(id: Uuid, tags: &[String], pool: &PGPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM event_tags WHERE event_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    for tag in tags {
        sqlx::query("INSERT INTO event_tags (event_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(id)
            .bind(tag)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await
}

pub async fn set_status(id: Uuid, status: EventStatus, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE events SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await;
    match res {
        Ok(val) => Ok(val.rows_affected()),
        Err(err) => Err(err)
    }
}

pub async fn set_attendee_count(id: Uuid, count: i32, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE events SET number_of_attendees = $1 WHERE id = $2")
        .bind(count)
        .bind(id)
        .execute(pool)
        .await;
    match res {
        Ok(val) => Ok(val.rows_affected()),
        Err(err) => Err(err)
    }
}

/// Users with an accepted RSVP, for update/cancellation notices.
pub async fn accepted_attendees(id: Uuid, pool: &PGPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id IN
        (SELECT user_id FROM rsvps WHERE event_id = $1 AND status = 'accepted')")
    .bind(id)
    .fetch_all(pool)
    .await
}

pub async fn set_fields(id: Uuid, fields: Vec<EventField>, pool: &PGPool) -> Result<u64, sqlx::Error> {
    if fields.is_empty() {
        return Ok(0u64);
    }
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "UPDATE events SET "
    );
    let mut separated = query_builder.separated(", ");
    for field in fields {
        match field {
            EventField::Title(v) => {
                separated.push("title = ");
                separated.push_bind_unseparated(v);
            },
            EventField::Descr(v) => {
                separated.push("descr = ");
                separated.push_bind_unseparated(v);
            },
            EventField::Dt(v) => {
                separated.push("dt = ");
                separated.push_bind_unseparated(v);
            },
            EventField::Place(v) => {
                separated.push("place = ");
                separated.push_bind_unseparated(v);
            },
            EventField::Address(v) => {
                separated.push("address = ");
                separated.push_bind_unseparated(v);
            },
            EventField::MaxAttendees(v) => {
                separated.push("max_attendees = ");
                separated.push_bind_unseparated(v);
            },
        }
    }
    query_builder.push(" WHERE id = ");
    query_builder.push_bind(id);
    let res = query_builder.build()
        .execute(pool)
        .await;
    match res {
        Ok(val) => Ok(val.rows_affected()),
        Err(err) => Err(err)
    }
}
