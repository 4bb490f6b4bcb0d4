use dashmap::DashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::Constants;

/// Sliding-window limiter keyed by client identifier
pub struct RateLimiter {
    attempts: DashMap<String, Vec<Instant>>,
    max_requests: usize,
    window: Duration,
    last_sweep: Mutex<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        RateLimiter::new(
            Constants::MAX_REGISTRATION_ATTEMPTS,
            Constants::RATE_LIMIT_WINDOW,
        )
    }
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        RateLimiter {
            attempts: DashMap::new(),
            max_requests,
            window,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Admit or reject a request from `client_id`, recording it when admitted
    pub fn check(&self, client_id: &str) -> bool {
        self.check_at(client_id, Instant::now())
    }

    pub fn check_at(&self, client_id: &str, now: Instant) -> bool {
        // Must run before the entry guard below is taken; retain locks every shard.
        self.sweep_if_due(now);

        // The entry guard holds the shard lock, so prune-count-push is atomic per client.
        let mut entry = self.attempts.entry(client_id.to_string()).or_default();
        entry.retain(|&t| now.saturating_duration_since(t) < self.window);

        if entry.len() >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.attempts.len()
    }

    /// Drop expired timestamps of every client, and clients left with none.
    /// Runs at most once per sweep interval.
    fn sweep_if_due(&self, now: Instant) {
        let Ok(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        let interval = self.window.min(Constants::RATE_LIMIT_SWEEP_INTERVAL);
        if now.saturating_duration_since(*last_sweep) < interval {
            return;
        }
        *last_sweep = now;
        drop(last_sweep);

        let before = self.tracked_clients();
        self.attempts.retain(|_, timestamps| {
            timestamps.retain(|&t| now.saturating_duration_since(t) < self.window);
            !timestamps.is_empty()
        });
        tracing::debug!(
            evicted = before.saturating_sub(self.tracked_clients()),
            "rate limit sweep"
        );
    }
}
