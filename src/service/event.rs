use chrono::{DateTime, Utc};
use log::warn;
use uuid::Uuid;

use crate::{dto::{NewEventDto, UpdateEventDto}, PGPool, models::{Event, EventStatus}, errors::ApiError, db};

use super::auth::UserAuthData;

/// Derives the lifecycle status from time and attendance. `canceled` is
/// terminal and is never overwritten here.
pub fn compute_status(
   current: EventStatus,
   now: DateTime<Utc>,
   scheduled_at: DateTime<Utc>,
   max_attendees: Option<i32>,
   accepted_count: i64
) -> EventStatus {
   if current == EventStatus::Canceled {
      return EventStatus::Canceled;
   }
   if now > scheduled_at {
      return EventStatus::Expired;
   }
   match max_attendees {
      Some(max) if accepted_count >= max as i64 => EventStatus::Full,
      _ => EventStatus::Active
   }
}

/// Recomputes the status of an already loaded event from a fresh accepted
/// count and persists it if it changed.
pub async fn resolve_status(event: &Event, pool: &PGPool) -> Result<EventStatus, sqlx::Error> {
   let accepted = db::rsvp::accepted_count(event.id, pool).await?;
   let next = compute_status(event.status, Utc::now(), event.dt, event.max_attendees, accepted);
   if next != event.status {
      db::event::set_status(event.id, next, pool).await?;
   }
   Ok(next)
}

pub async fn refresh_status(event_id: Uuid, pool: &PGPool) -> Result<EventStatus, sqlx::Error> {
   let event = db::event::get_by_id(event_id, pool).await?;
   resolve_status(&event, pool).await
}

/// A failed refresh never fails the surrounding request; the stale status
/// stands until the next successful recompute.
pub async fn refresh_status_quiet(event_id: Uuid, pool: &PGPool) {
   if let Err(err) = refresh_status(event_id, pool).await {
      warn!("status refresh failed for event {}: {:?}", event_id, err);
   }
}

async fn self_heal(event: &mut Event, pool: &PGPool) {
   match resolve_status(event, pool).await {
      Ok(status) => event.status = status,
      Err(err) => warn!("status refresh failed for event {}: {:?}", event.id, err)
   }
}

pub async fn create(user_auth_data: &UserAuthData, dto: NewEventDto, pool: &PGPool) -> Result<Event, ApiError> {
   if dto.title.trim().is_empty() {
      return Err(ApiError::Validation);
   }
   if let Some(max) = dto.max_attendees {
      if max < 1 {
         return Err(ApiError::Validation);
      }
   }
   let event = Event {
      id: Uuid::new_v4(),
      title: dto.title,
      descr: dto.descr,
      dt: dto.dt,
      place: dto.place,
      address: dto.address,
      max_attendees: dto.max_attendees,
      number_of_attendees: 0,
      status: EventStatus::Active,
      creator: user_auth_data.user_id,
      created_at: Utc::now()
   };
   let res = db::event::create(event.clone(), pool)
      .await;
   match res {
      Ok(_) => {
         if let Err(err) = db::event::replace_tags(event.id, &dto.tags, pool).await {
            warn!("storing tags for event {} failed: {:?}", event.id, err);
         }
         Ok(event)
      },
      Err(_) => {
         Err(ApiError::InternalError)
      }
   }
}

pub async fn get_all(pool: &PGPool) -> Result<Vec<Event>, ApiError> {
   let res = db::event::get_all(pool)
      .await;
   match res {
      Ok(mut events) => {
         for event in events.iter_mut() {
            self_heal(event, pool).await;
         }
         Ok(events)
      },
      Err(_) => Err(ApiError::InternalError)
   }
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Event, ApiError> {
   let mut event = db::event::get_by_id(id, pool)
      .await
      .map_err(ApiError::from)?;
   self_heal(&mut event, pool).await;
   Ok(event)
}

pub async fn get_by_creator(creator: Uuid, pool: &PGPool) -> Result<Vec<Event>, ApiError> {
   let res = db::event::get_by_creator(creator, pool)
      .await;
   match res {
      Ok(mut events) => {
         for event in events.iter_mut() {
            self_heal(event, pool).await;
         }
         Ok(events)
      },
      Err(_) => Err(ApiError::InternalError)
   }
}

pub async fn update(
   id: Uuid,
   dto: UpdateEventDto,
   user_auth_data: &UserAuthData,
   pool: &PGPool
) -> Result<(), ApiError> {
   let event = db::event::get_by_id(id, pool)
      .await
      .map_err(ApiError::from)?;
   if user_auth_data.user_id != event.creator {
      return Err(ApiError::Forbidden);
   }
   if event.status == EventStatus::Canceled {
      return Err(ApiError::Conflict);
   }
   if let Some(max) = dto.max_attendees {
      if max < 1 {
         return Err(ApiError::Validation);
      }
   }
   if let Some(fields) = dto.changes() {
      let update_res = db::event::set_fields(id, fields, pool)
         .await;
      if update_res.is_err() {
         return Err(ApiError::InternalError);
      }
   }
   if let Some(tags) = &dto.tags {
      if let Err(err) = db::event::replace_tags(id, tags, pool).await {
         warn!("replacing tags for event {} failed: {:?}", id, err);
      }
   }
   // capacity may have changed
   refresh_status_quiet(id, pool).await;
   Ok(())
}

pub async fn cancel(id: Uuid, user_auth_data: &UserAuthData, pool: &PGPool) -> Result<(), ApiError> {
   let event = db::event::get_by_id(id, pool)
      .await
      .map_err(ApiError::from)?;
   if user_auth_data.user_id != event.creator {
      return Err(ApiError::Forbidden);
   }
   if event.status == EventStatus::Canceled {
      return Err(ApiError::Conflict);
   }
   let res = db::event::set_status(id, EventStatus::Canceled, pool)
      .await;
   match res {
      Ok(_) => Ok(()),
      Err(_) => Err(ApiError::InternalError)
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use chrono::Duration;

   fn soon() -> DateTime<Utc> {
      Utc::now() + Duration::hours(3)
   }

   #[test]
   fn canceled_is_sticky() {
      let now = Utc::now();
      let status = compute_status(EventStatus::Canceled, now, soon(), Some(10), 0);
      assert_eq!(status, EventStatus::Canceled);
      // not even time passing flips it back
      let status = compute_status(EventStatus::Canceled, now, now - Duration::days(2), None, 99);
      assert_eq!(status, EventStatus::Canceled);
   }

   #[test]
   fn past_events_expire_regardless_of_cached_status() {
      let now = Utc::now();
      let yesterday = now - Duration::days(1);
      for cached in [EventStatus::Active, EventStatus::Full] {
         assert_eq!(
            compute_status(cached, now, yesterday, Some(5), 5),
            EventStatus::Expired
         );
      }
   }

   #[test]
   fn capacity_toggles_full_and_active() {
      let now = Utc::now();
      let dt = soon();
      assert_eq!(compute_status(EventStatus::Active, now, dt, Some(2), 2), EventStatus::Full);
      // a withdrawal or a raised capacity reopens the event
      assert_eq!(compute_status(EventStatus::Full, now, dt, Some(2), 1), EventStatus::Active);
      assert_eq!(compute_status(EventStatus::Full, now, dt, Some(3), 2), EventStatus::Active);
   }

   #[test]
   fn unlimited_capacity_never_fills() {
      let status = compute_status(EventStatus::Active, Utc::now(), soon(), None, 10_000);
      assert_eq!(status, EventStatus::Active);
   }
}
