use serde::{Deserialize, Serialize};
use chrono::{self, Utc};
use uuid::Uuid;

use crate::models::{EventStatus, RsvpStatus};

#[derive(Debug, Deserialize, Clone)]
pub struct NewEventDto {
    pub title: String,
    pub descr: String,
    pub dt: chrono::DateTime<Utc>,
    pub place: Option<String>,
    pub address: Option<String>,
    pub max_attendees: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateEventDto {
    pub title: Option<String>,
    pub descr: Option<String>,
    pub dt: Option<chrono::DateTime<Utc>>,
    pub place: Option<String>,
    pub address: Option<String>,
    pub max_attendees: Option<i32>,
    pub tags: Option<Vec<String>>,
}

pub enum EventField {
    Title(String),
    Descr(String),
    Dt(chrono::DateTime<Utc>),
    Place(String),
    Address(String),
    MaxAttendees(i32),
}

impl UpdateEventDto {
    pub fn changes(&self) -> Option<Vec<EventField>> {
        let mut fields: Vec<EventField> = Vec::new();
        if let Some(v) = &self.title {
            fields.push(EventField::Title(v.to_string()));
        }
        if let Some(v) = &self.descr {
            fields.push(EventField::Descr(v.to_string()));
        }
        if let Some(v) = &self.dt {
            fields.push(EventField::Dt(*v));
        }
        if let Some(v) = &self.place {
            fields.push(EventField::Place(v.to_string()));
        }
        if let Some(v) = &self.address {
            fields.push(EventField::Address(v.to_string()));
        }
        if let Some(v) = self.max_attendees {
            fields.push(EventField::MaxAttendees(v));
        }

        if fields.is_empty() {
            None
        } else {
            Some(fields)
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RsvpDto {
    pub status: RsvpStatus,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewInviteDto {
    /// Username or email of the user to invite.
    pub identifier: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InviteReply {
    Accepted,
    Declined,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InviteResponseDto {
    pub status: InviteReply,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
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
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_has_no_changes() {
        let dto = UpdateEventDto {
            title: None,
            descr: None,
            dt: None,
            place: None,
            address: None,
            max_attendees: None,
            tags: None,
        };
        assert!(dto.changes().is_none());
    }

    #[test]
    fn set_fields_are_extracted() {
        let dto = UpdateEventDto {
            title: Some("Rust meetup".into()),
            descr: None,
            dt: None,
            place: None,
            address: None,
            max_attendees: Some(30),
            tags: None,
        };
        let changes = dto.changes().unwrap();
        assert_eq!(changes.len(), 2);
        assert!(matches!(changes[0], EventField::Title(_)));
        assert!(matches!(changes[1], EventField::MaxAttendees(30)));
    }

    #[test]
    fn invite_reply_accepts_only_known_values() {
        let ok: Result<InviteResponseDto, _> = serde_json::from_str(r#"{"status":"declined"}"#);
        assert_eq!(ok.unwrap().status, InviteReply::Declined);
        let bad: Result<InviteResponseDto, _> = serde_json::from_str(r#"{"status":"maybe"}"#);
        assert!(bad.is_err());
    }
}
