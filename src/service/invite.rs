use chrono::Utc;
use log::warn;
use uuid::Uuid;

use crate::{PGPool, models::{Invitation, InviteStatus}, dto::InviteReply, errors::ApiError, db};

use super::{auth::UserAuthData, email::{self, Mailer}};

/// Resolves the identifier (username or email, case-insensitive), records
/// the invitation and fans out a notification plus an informational email.
/// The email is attempted after the rows are committed; its failure is
/// logged only.
pub async fn send(
    event_id: Uuid,
    inviter: &UserAuthData,
    identifier: &str,
    mailer: &dyn Mailer,
    pool: &PGPool
) -> Result<Uuid, ApiError> {
    let event = db::event::get_by_id(event_id, pool)
        .await
        .map_err(ApiError::from)?;
    if event.creator != inviter.user_id {
        return Err(ApiError::Forbidden);
    }
    let invitee = db::user::find_by_identifier(identifier, pool)
        .await
        .map_err(ApiError::from)?
        .ok_or(ApiError::NotFound)?;
    if invitee.id == inviter.user_id {
        return Err(ApiError::Validation);
    }
    if db::invitations::exists(event_id, invitee.id, pool).await {
        return Err(ApiError::Conflict);
    }

    let invitation = Invitation {
        id: Uuid::new_v4(),
        event_id,
        user_id: invitee.id,
        inviter: inviter.user_id,
        status: Some(InviteStatus::Pending),
        created_at: Utc::now()
    };
    let res = db::invitations::create(invitation.clone(), pool)
        .await;
    if res.is_err() {
        return Err(ApiError::InternalError);
    }

    let content = format!("You were invited to '{}'", event.title);
    if let Err(err) = db::notification::insert(
        invitee.id,
        Some(event_id),
        Some(invitation.id),
        &content,
        pool
    ).await {
        warn!("invite notification for event {} failed: {:?}", event_id, err);
    }

    if let Some(address) = &invitee.email {
        let inviter_name = match db::user::get_by_id(inviter.user_id, pool).await {
            Ok(user) => user.username,
            Err(_) => "The organizer".to_string()
        };
        let (subject, body) = email::invite_notice(&event, &inviter_name);
        if let Err(err) = mailer.send(address, &subject, &body) {
            warn!("invite email to {} failed: {:?}", address, err);
        }
    }

    Ok(invitation.id)
}

/// Accepting sets the status, declining clears it back to null. Either way
/// the event author hears about the response. Attendance itself is a
/// separate RSVP submitted by the client afterwards.
pub async fn respond(
    invitation_id: Uuid,
    responder: Uuid,
    reply: InviteReply,
    pool: &PGPool
) -> Result<(), ApiError> {
    let invitation = db::invitations::get_by_id(invitation_id, pool)
        .await
        .map_err(ApiError::from)?;
    if invitation.user_id != responder {
        return Err(ApiError::Forbidden);
    }

    let status = match reply {
        InviteReply::Accepted => Some(InviteStatus::Accepted),
        InviteReply::Declined => None
    };
    db::invitations::set_status(invitation_id, status, pool)
        .await
        .map_err(ApiError::from)?;

    notify_author(&invitation, reply, pool).await;
    Ok(())
}

async fn notify_author(invitation: &Invitation, reply: InviteReply, pool: &PGPool) {
    let event = match db::event::get_by_id(invitation.event_id, pool).await {
        Ok(event) => event,
        Err(err) => {
            warn!("loading event {} failed: {:?}", invitation.event_id, err);
            return;
        }
    };
    let username = match db::user::get_by_id(invitation.user_id, pool).await {
        Ok(user) => user.username,
        Err(_) => "The invitee".to_string()
    };
    let content = match reply {
        InviteReply::Accepted => format!("{} accepted the invitation to '{}'", username, event.title),
        InviteReply::Declined => format!("{} declined the invitation to '{}'", username, event.title)
    };
    if let Err(err) = db::notification::insert(
        event.creator,
        Some(event.id),
        Some(invitation.id),
        &content,
        pool
    ).await {
        warn!("invite response notification for event {} failed: {:?}", event.id, err);
    }
}
