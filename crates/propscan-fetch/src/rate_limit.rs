//! Minimum-interval rate limiting shared by all concurrent fetch tasks.
//!
//! One [`RateLimiter`] instance throttles the aggregate request rate of every
//! task holding a reference to it. Grants are scheduled, not merely delayed:
//! each acquisition reserves the next free slot on a monotonic timeline, so
//! the k-th of N concurrent callers is granted at least `(k-1) * min_interval`
//! after the first regardless of arrival order.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between successive grants.
///
/// Safe to share across tasks (`&RateLimiter` or `Arc<RateLimiter>`). The
/// internal mutex queue is FIFO, so callers are granted in arrival order and
/// none starves. The schedule resets only when the limiter is reconstructed.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits until this caller's scheduled slot, then returns.
    ///
    /// The slot is reserved under the lock (last scheduled time plus the
    /// interval, or now if the schedule has lapsed); the wait itself happens
    /// outside the lock so later callers can reserve their own slots while
    /// earlier ones sleep.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = (*next).filter(|scheduled| *scheduled > now).unwrap_or(now);
            *next = Some(slot + self.min_interval);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_granted_immediately() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_acquires_are_spaced_by_the_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(200));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(
            start.elapsed() >= Duration::from_millis(400),
            "third grant came too early: {:?}",
            start.elapsed()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_acquires_respect_the_schedule() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(100)));
        let start = Instant::now();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..5 {
            let limiter = Arc::clone(&limiter);
            tasks.spawn(async move {
                limiter.acquire().await;
                start.elapsed()
            });
        }

        let mut grants = Vec::new();
        while let Some(grant) = tasks.join_next().await {
            grants.push(grant.unwrap());
        }
        grants.sort_unstable();

        assert_eq!(grants.len(), 5);
        for (k, granted_at) in grants.iter().enumerate() {
            let floor = Duration::from_millis(100) * u32::try_from(k).unwrap();
            assert!(
                *granted_at >= floor,
                "grant {k} at {granted_at:?}, expected at least {floor:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_grants_immediately() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn lapsed_schedule_does_not_accumulate_credit() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        // After a long idle gap the next two grants still honour one interval
        // between them, measured from the new grant, not the stale schedule.
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
