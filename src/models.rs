use chrono::Utc;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Full,
    Expired,
    Canceled
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "rsvp_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Accepted,
    Declined
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "digest_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DigestFrequency {
    Daily,
    Weekly
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub verified: bool,
    pub allow_notifications: bool,
    pub digest_frequency: DigestFrequency
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub descr: String,
    pub dt: chrono::DateTime<Utc>,
    pub place: Option<String>,
    pub address: Option<String>,
    pub max_attendees: Option<i32>,
    pub number_of_attendees: i32,
    pub status: EventStatus,
    pub creator: Uuid,
    pub created_at: chrono::DateTime<Utc>
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Rsvp {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RsvpStatus,
    pub updated_at: chrono::DateTime<Utc>
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub inviter: Uuid,
    pub status: Option<InviteStatus>,
    pub created_at: chrono::DateTime<Utc>
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient: Uuid,
    pub event_id: Option<Uuid>,
    pub invitation_id: Option<Uuid>,
    pub content: String,
    pub seen: bool,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct EmailQueueEntry {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: String,
    pub created_at: chrono::DateTime<Utc>
}
