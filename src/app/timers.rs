use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};

use crate::app::automator::BoardAutomator;
use crate::domain::ports::{BoardRepository, Clock};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedJob {
    MergeNight,
    Transition,
}

/// Local times of day at which the two recurring board jobs fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerPlan {
    pub offset: FixedOffset,
    pub merge_night_at: NaiveTime,
    pub transition_at: NaiveTime,
}

/// First instant strictly after `now` whose local time of day is `at`.
pub fn next_fire(offset: FixedOffset, at: NaiveTime, now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now.with_timezone(&offset);
    let mut candidate = local.date_naive().and_time(at);
    if candidate <= local.naive_local() {
        candidate += Duration::days(1);
    }
    (candidate - Duration::seconds(offset.local_minus_utc() as i64)).and_utc()
}

impl TimerPlan {
    pub fn next_job(&self, now: DateTime<Utc>) -> (TimedJob, DateTime<Utc>) {
        let merge = next_fire(self.offset, self.merge_night_at, now);
        let transition = next_fire(self.offset, self.transition_at, now);
        if merge <= transition {
            (TimedJob::MergeNight, merge)
        } else {
            (TimedJob::Transition, transition)
        }
    }
}

/// Runs the timed jobs until ctrl-c. A failed run is logged and the loop
/// waits for the next fire time.
pub async fn watch<R, C>(automator: &BoardAutomator<R, C>, plan: TimerPlan, enabled: bool) -> Result<()>
where
    R: BoardRepository,
    C: Clock,
{
    if !enabled {
        tracing::warn!("Timers are disabled; set timers.enabled = true to run them");
        return Ok(());
    }

    loop {
        let now = automator.now();
        let (job, at) = plan.next_job(now);
        let wait = (at - now).to_std().unwrap_or_default();
        tracing::info!("Next job {:?} at {}", job, at);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping timers");
                return Ok(());
            }
        }

        if let Err(e) = automator.run_job(job).await {
            tracing::error!(
                "Timed job {:?} failed: {} (Category: {:?}, Severity: {:?})",
                job,
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
        }
    }
}
