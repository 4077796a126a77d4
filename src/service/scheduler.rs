use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use log::{error, info};
use tokio_util::sync::CancellationToken;

use crate::{PGPool, models::DigestFrequency};

use super::{digest, email::DynMailer};

/// Wall-clock trigger in the pinned timezone. Equivalent crontab lines:
/// DAILY = "0 0 * * *", WEEKLY = "0 0 * * 0".
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub hour: u32,
    pub minute: u32,
    pub weekday: Option<Weekday>,
}

pub const DAILY: Trigger = Trigger { hour: 0, minute: 0, weekday: None };
pub const WEEKLY: Trigger = Trigger { hour: 0, minute: 0, weekday: Some(Weekday::Sun) };

/// Next wall-clock occurrence strictly after `after`. Local times that do
/// not exist in the zone (spring-forward gap) roll over to the next day.
pub fn next_occurrence(after: DateTime<Tz>, trigger: &Trigger) -> DateTime<Tz> {
    let mut date = after.date_naive();
    loop {
        if trigger.weekday.map_or(true, |wd| date.weekday() == wd) {
            let naive = date.and_hms_opt(trigger.hour, trigger.minute, 0).unwrap();
            if let Some(candidate) = after.timezone().from_local_datetime(&naive).earliest() {
                if candidate > after {
                    return candidate;
                }
            }
        }
        date = date.succ_opt().unwrap();
    }
}

/// Registers both recurring digest triggers. Each loop sleeps until its
/// next local occurrence, runs the processor and reschedules; runs are
/// independently idempotent, so an overlap with a crashed previous run is
/// harmless.
pub fn spawn(tz: Tz, mailer: DynMailer, pool: PGPool, shutdown: CancellationToken) {
    tokio::spawn(run(DigestFrequency::Daily, DAILY, tz, mailer.clone(), pool.clone(), shutdown.clone()));
    tokio::spawn(run(DigestFrequency::Weekly, WEEKLY, tz, mailer, pool, shutdown));
}

async fn run(
    frequency: DigestFrequency,
    trigger: Trigger,
    tz: Tz,
    mailer: DynMailer,
    pool: PGPool,
    shutdown: CancellationToken
) {
    loop {
        let now = Utc::now().with_timezone(&tz);
        let next = next_occurrence(now, &trigger);
        let wait = (next - now).to_std().unwrap_or(std::time::Duration::ZERO);
        info!("next {:?} digest run at {}", frequency, next);
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("{:?} digest trigger stopped", frequency);
                return;
            }
            _ = tokio::time::sleep(wait) => {}
        }
        if let Err(err) = digest::process(frequency, mailer.as_ref(), &pool).await {
            error!("{:?} digest run failed: {:?}", frequency, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Berlin.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn daily_fires_next_midnight() {
        // 2026-08-07 is a Friday
        let next = next_occurrence(at(2026, 8, 7, 10, 30), &DAILY);
        assert_eq!(next, at(2026, 8, 8, 0, 0));
    }

    #[test]
    fn daily_at_midnight_fires_the_following_day() {
        let next = next_occurrence(at(2026, 8, 7, 0, 0), &DAILY);
        assert_eq!(next, at(2026, 8, 8, 0, 0));
    }

    #[test]
    fn weekly_fires_on_sunday_midnight() {
        let next = next_occurrence(at(2026, 8, 7, 10, 30), &WEEKLY);
        assert_eq!(next, at(2026, 8, 9, 0, 0));
        assert_eq!(next.weekday(), Weekday::Sun);
    }

    #[test]
    fn weekly_on_sunday_fires_the_following_week() {
        let next = next_occurrence(at(2026, 8, 9, 0, 0), &WEEKLY);
        assert_eq!(next, at(2026, 8, 16, 0, 0));
    }
}
