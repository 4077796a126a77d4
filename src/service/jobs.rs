use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{PGPool, db};

use super::{email::{self, DynMailer}, queue};

/// Fire-and-forget side effects submitted after the HTTP response is gone.
/// Failures surface on the worker's log channel, never to the API caller.
#[derive(Debug)]
pub enum Job {
    EnqueueDigest { event_id: Uuid, author_id: Uuid },
    NotifyEventUpdated { event_id: Uuid },
    NotifyEventCanceled { event_id: Uuid },
}

#[derive(Clone)]
pub struct JobSender(mpsc::UnboundedSender<Job>);

impl JobSender {
    pub fn submit(&self, job: Job) {
        if let Err(err) = self.0.send(job) {
            error!("background worker is gone, job dropped: {:?}", err.0);
        }
    }
}

pub fn spawn_worker(pool: PGPool, mailer: DynMailer, shutdown: CancellationToken) -> JobSender {
    let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("background worker stopped");
                    return;
                }
                job = rx.recv() => {
                    let Some(job) = job else { return };
                    if let Err(err) = handle(&job, mailer.as_ref(), &pool).await {
                        error!("background job {:?} failed: {:?}", job, err);
                    }
                }
            }
        }
    });
    JobSender(tx)
}

async fn handle(job: &Job, mailer: &dyn email::Mailer, pool: &PGPool) -> Result<(), sqlx::Error> {
    match job {
        Job::EnqueueDigest { event_id, author_id } => {
            queue::enqueue_digest_candidates(*event_id, *author_id, pool).await?;
        }
        Job::NotifyEventUpdated { event_id } => {
            notify_attendees(*event_id, false, mailer, pool).await?;
        }
        Job::NotifyEventCanceled { event_id } => {
            notify_attendees(*event_id, true, mailer, pool).await?;
        }
    }
    Ok(())
}

/// Tells every accepted attendee about an update or a cancellation, in-app
/// and by email. The in-app notification overwrites a still unseen one for
/// the same event instead of stacking up.
async fn notify_attendees(
    event_id: Uuid,
    canceled: bool,
    mailer: &dyn email::Mailer,
    pool: &PGPool
) -> Result<(), sqlx::Error> {
    let event = db::event::get_by_id(event_id, pool).await?;
    let attendees = db::event::accepted_attendees(event_id, pool).await?;
    let (subject, body) = if canceled {
        email::event_canceled_notice(&event)
    } else {
        email::event_updated_notice(&event)
    };
    let content = if canceled {
        format!("'{}' was canceled", event.title)
    } else {
        format!("'{}' was updated", event.title)
    };
    for attendee in attendees {
        if let Err(err) = db::notification::upsert_unseen(attendee.id, event_id, &content, pool).await {
            warn!("notification for user {} failed: {:?}", attendee.id, err);
        }
        if let Some(address) = &attendee.email {
            if let Err(err) = mailer.send(address, &subject, &body) {
                warn!("notice email to {} failed: {:?}", address, err);
            }
        }
    }
    Ok(())
}
