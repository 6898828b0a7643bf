//! Ingestion scheduler.
//!
//! One background task per configured country. Each task sleeps until the
//! next synoptic slot (00, 03, ..., 21 UTC) at the country's minute
//! offset, then fires the pipeline in a detached task. A per-country
//! in-progress guard skips a slot when the previous run has not finished,
//! so at most one scheduled run per country is ever in flight. A failed
//! run is logged and the job simply re-arms for the next slot.

use chrono::{DateTime, Days, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use super::config::{CountrySchedule, IngestConfig};
use super::pipeline::IngestPipeline;

/// The three-hourly synoptic observation hours (UTC).
const SYNOPTIC_HOURS: [u32; 8] = [0, 3, 6, 9, 12, 15, 18, 21];

/// The ingestion scheduler, owner of the per-country job table.
pub struct IngestScheduler {
    config: IngestConfig,
    pipeline: Arc<IngestPipeline>,
}

impl IngestScheduler {
    pub fn new(config: IngestConfig, pipeline: Arc<IngestPipeline>) -> Self {
        Self { config, pipeline }
    }

    /// Spawn one recurring job per configured country. The returned
    /// handles are detached by the caller; jobs run until the process
    /// exits.
    pub fn start(self) -> Vec<JoinHandle<()>> {
        let startup_delay = Duration::from_secs(self.config.startup_delay_secs);

        self.config
            .countries
            .into_iter()
            .map(|schedule| {
                let pipeline = Arc::clone(&self.pipeline);
                tokio::spawn(country_job(schedule, pipeline, startup_delay))
            })
            .collect()
    }
}

async fn country_job(
    schedule: CountrySchedule,
    pipeline: Arc<IngestPipeline>,
    startup_delay: Duration,
) {
    sleep(startup_delay).await;
    info!(
        country_code = %schedule.country_code,
        minute_offset = schedule.minute_offset,
        "Ingestion job armed"
    );

    let in_progress = Arc::new(AtomicBool::new(false));

    loop {
        let now = Utc::now();
        let fire_at = next_synoptic_fire(now, schedule.minute_offset);
        let wait = (fire_at - now).to_std().unwrap_or(Duration::ZERO);
        debug!(
            country_code = %schedule.country_code,
            %fire_at,
            "Sleeping until next synoptic slot"
        );
        sleep(wait).await;

        if in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(
                country_code = %schedule.country_code,
                "Previous run still in progress, skipping this slot"
            );
            continue;
        }

        let guard = RunGuard(Arc::clone(&in_progress));
        let pipeline = Arc::clone(&pipeline);
        let country_code = schedule.country_code.clone();
        tokio::spawn(async move {
            let _guard = guard;
            match pipeline.ingest(&country_code).await {
                Ok(count) => {
                    info!(%country_code, records = count, "Scheduled ingestion completed");
                }
                Err(e) => {
                    // The job stays scheduled; the next slot fires regardless.
                    error!(%country_code, error = ?e, "Scheduled ingestion failed");
                }
            }
        });
    }
}

/// Clears the in-progress flag when the run ends, however it ends. A run
/// that panics must not leave the flag set, or every future slot for the
/// country would be skipped.
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The next instant strictly after `now` that lands on a synoptic hour at
/// the given minute offset.
fn next_synoptic_fire(now: DateTime<Utc>, minute_offset: u32) -> DateTime<Utc> {
    for day in 0..=1u64 {
        let Some(date) = now.date_naive().checked_add_days(Days::new(day)) else {
            continue;
        };
        for hour in SYNOPTIC_HOURS {
            let Some(candidate) = date.and_hms_opt(hour, minute_offset, 0) else {
                continue;
            };
            let candidate = candidate.and_utc();
            if candidate > now {
                return candidate;
            }
        }
    }
    // Unreachable for minute_offset < 60; keep the job alive regardless.
    now + chrono::Duration::hours(3)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_next_fire_within_same_slot_hour() {
        let now = utc(2024, 9, 1, 14, 59, 0);
        assert_eq!(next_synoptic_fire(now, 15), utc(2024, 9, 1, 15, 15, 0));
    }

    #[test]
    fn test_next_fire_is_strictly_after_now() {
        let now = utc(2024, 9, 1, 15, 15, 0);
        assert_eq!(next_synoptic_fire(now, 15), utc(2024, 9, 1, 18, 15, 0));
    }

    #[test]
    fn test_next_fire_rolls_over_to_next_day() {
        let now = utc(2024, 9, 1, 21, 30, 0);
        assert_eq!(next_synoptic_fire(now, 25), utc(2024, 9, 2, 0, 25, 0));
    }

    #[test]
    fn test_next_fire_minute_offset_still_due_this_hour() {
        let now = utc(2024, 9, 1, 21, 10, 0);
        assert_eq!(next_synoptic_fire(now, 25), utc(2024, 9, 1, 21, 25, 0));
    }

    #[test]
    fn test_next_fire_zero_offset_midnight() {
        let now = utc(2024, 9, 1, 23, 59, 59);
        assert_eq!(next_synoptic_fire(now, 0), utc(2024, 9, 2, 0, 0, 0));
    }

    #[tokio::test]
    async fn test_run_guard_clears_flag_even_when_run_panics() {
        let flag = Arc::new(AtomicBool::new(true));
        let guard = RunGuard(Arc::clone(&flag));

        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("run blew up mid-flight");
        });

        assert!(handle.await.is_err());
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_staggered_offsets_never_coincide() {
        let now = utc(2024, 9, 1, 11, 0, 0);
        let bel = next_synoptic_fire(now, 15);
        let rus = next_synoptic_fire(now, 20);
        let ua = next_synoptic_fire(now, 25);
        assert_ne!(bel, rus);
        assert_ne!(rus, ua);
        assert_ne!(bel, ua);
    }
}
