//! Date-Rollover Watcher
//!
//! Recurring check of the local calendar date; on change, every registered
//! cache domain is invalidated so a session left open across local midnight
//! converges to the new day's data without a manual reload.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::dates;
use crate::store::CacheDomain;

/// Interval between checks; coarser than a minute would delay convergence
pub const DEFAULT_CHECK_PERIOD: Duration = Duration::from_secs(60);

pub struct DateRolloverWatcher {
    handle: tokio::task::JoinHandle<()>,
}

impl DateRolloverWatcher {
    /// Spawn the recurring check. The interval keeps running across
    /// rollovers; dropping the watcher stops it.
    pub fn spawn(
        clock: Arc<dyn Clock>,
        timezone: impl Into<String>,
        period: Duration,
        domains: Vec<Arc<dyn CacheDomain>>,
    ) -> Self {
        let timezone = timezone.into();
        let handle = tokio::spawn(async move {
            let mut last_seen = dates::today_in(clock.now(), &timezone);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // First tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let current = dates::today_in(clock.now(), &timezone);
                if current != last_seen {
                    log::info!(
                        "local date rolled over to {}, invalidating date-keyed caches",
                        current
                    );
                    for domain in &domains {
                        domain.invalidate_all();
                    }
                    last_seen = current;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for DateRolloverWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::Todo;
    use crate::store::TodoCache;
    use chrono::TimeZone;

    fn filled_cache() -> Arc<TodoCache> {
        let cache = Arc::new(TodoCache::new());
        cache.fill(
            "2024-06-01",
            vec![Todo {
                id: "srv-1".to_string(),
                title: "a".to_string(),
                done: false,
                order: 0,
                for_date: "2024-06-01".to_string(),
                due_date: None,
            }],
        );
        cache
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidates_on_local_date_change() {
        let clock = Arc::new(ManualClock::new(
            chrono::Utc.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap(),
        ));
        let cache = filled_cache();
        let notes = Arc::new(crate::store::SlotCache::new());
        notes.put("2024-06-01", "note".to_string());
        let _watcher = DateRolloverWatcher::spawn(
            clock.clone(),
            "UTC",
            DEFAULT_CHECK_PERIOD,
            vec![cache.clone(), notes.clone()],
        );

        // Same date: several periods pass without invalidation.
        tokio::time::sleep(Duration::from_secs(180)).await;
        assert!(cache.snapshot("2024-06-01").is_some());

        // Cross local midnight; the next check evicts every domain.
        clock.set(chrono::Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 30).unwrap());
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(cache.snapshot("2024-06-01").is_none());
        assert!(notes.get("2024-06-01").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rollover_uses_the_given_timezone() {
        // 04:30 UTC on June 2nd is still June 1st evening in Los Angeles.
        let clock = Arc::new(ManualClock::new(
            chrono::Utc.with_ymd_and_hms(2024, 6, 2, 4, 30, 0).unwrap(),
        ));
        let cache = filled_cache();
        let _watcher = DateRolloverWatcher::spawn(
            clock.clone(),
            "America/Los_Angeles",
            Duration::from_secs(60),
            vec![cache.clone()],
        );

        // UTC midnight already passed; LA date has not changed.
        clock.set(chrono::Utc.with_ymd_and_hms(2024, 6, 2, 5, 30, 0).unwrap());
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(cache.snapshot("2024-06-01").is_some());

        // LA midnight is 07:00 UTC during PDT.
        clock.set(chrono::Utc.with_ymd_and_hms(2024, 6, 2, 7, 1, 0).unwrap());
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(cache.snapshot("2024-06-01").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_the_check() {
        let clock = Arc::new(ManualClock::new(
            chrono::Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ));
        let cache = filled_cache();
        let watcher = DateRolloverWatcher::spawn(
            clock.clone(),
            "UTC",
            Duration::from_secs(60),
            vec![cache.clone()],
        );
        drop(watcher);

        clock.set(chrono::Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap());
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert!(cache.snapshot("2024-06-01").is_some());
    }
}
