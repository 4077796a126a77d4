use derive_more::{Display, Error};
use log::info;

use crate::models::Event;

use super::ranking::EventWithTags;

#[derive(Debug, Display, Error)]
#[display(fmt = "email dispatch failed")]
pub struct MailError;

/// Content and triggering contract for outgoing mail. Transport lives
/// outside this service; the production gateway hands the rendered message
/// over and reports failure without retrying.
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

pub type DynMailer = std::sync::Arc<dyn Mailer>;

/// Gateway used when no transport is configured: the dispatch is logged and
/// counts as delivered.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        info!("email to {}: '{}' ({} bytes)", to, subject, html_body.len());
        Ok(())
    }
}

fn format_when(event: &Event) -> String {
    event.dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn format_where(event: &Event) -> String {
    match (&event.place, &event.address) {
        (Some(place), Some(address)) => format!("{}, {}", place, address),
        (Some(place), None) => place.clone(),
        (None, Some(address)) => address.clone(),
        (None, None) => "location to be announced".to_string()
    }
}

pub fn invite_notice(event: &Event, inviter_name: &str) -> (String, String) {
    let subject = format!("You are invited to '{}'", event.title);
    let body = format!(
        "<p>{} invited you to <b>{}</b>.</p>\
        <p>{} - {}</p>\
        <p>{}</p>",
        inviter_name,
        event.title,
        format_when(event),
        format_where(event),
        event.descr
    );
    (subject, body)
}

pub fn event_updated_notice(event: &Event) -> (String, String) {
    let subject = format!("'{}' was updated", event.title);
    let body = format!(
        "<p>The event <b>{}</b> you are attending changed.</p>\
        <p>Now: {} - {}</p>",
        event.title,
        format_when(event),
        format_where(event)
    );
    (subject, body)
}

pub fn event_canceled_notice(event: &Event) -> (String, String) {
    let subject = format!("'{}' was canceled", event.title);
    let body = format!(
        "<p>The event <b>{}</b> scheduled for {} was canceled by its organizer.</p>",
        event.title,
        format_when(event)
    );
    (subject, body)
}

pub fn digest_email(username: &str, picks: &[EventWithTags], reminders: &[Event]) -> (String, String) {
    let subject = "Your event digest".to_string();
    let mut body = format!("<h1>Hi {},</h1>", username);
    if !picks.is_empty() {
        body.push_str("<h2>Picked for you</h2><ul>");
        for pick in picks {
            body.push_str(&format!(
                "<li><b>{}</b> - {} - {}</li>",
                pick.event.title,
                format_when(&pick.event),
                format_where(&pick.event)
            ));
        }
        body.push_str("</ul>");
    }
    if !reminders.is_empty() {
        body.push_str("<h2>You are attending soon</h2><ul>");
        for event in reminders {
            body.push_str(&format!(
                "<li><b>{}</b> - {}</li>",
                event.title,
                format_when(event)
            ));
        }
        body.push_str("</ul>");
    }
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn event(title: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            descr: "descr".to_string(),
            dt: Utc::now(),
            place: Some("Community hall".to_string()),
            address: None,
            max_attendees: None,
            number_of_attendees: 0,
            status: EventStatus::Active,
            creator: Uuid::new_v4(),
            created_at: Utc::now()
        }
    }

    #[test]
    fn invite_notice_names_the_event_and_inviter() {
        let (subject, body) = invite_notice(&event("Rust meetup"), "alice");
        assert!(subject.contains("Rust meetup"));
        assert!(body.contains("alice"));
        assert!(body.contains("Community hall"));
    }

    #[test]
    fn digest_lists_picks_and_reminders() {
        let pick = EventWithTags { event: event("Picked"), tags: vec![] };
        let reminder = event("Reminder");
        let (_, body) = digest_email("bob", &[pick], &[reminder]);
        assert!(body.contains("Picked"));
        assert!(body.contains("Reminder"));
        assert!(body.contains("bob"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let (_, body) = digest_email("bob", &[], &[]);
        assert!(!body.contains("<h2>"));
    }
}
