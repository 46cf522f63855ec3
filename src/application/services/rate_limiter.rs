//! Per-user sliding-window rate limiting for button presses.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::domain::entities::UserId;
use crate::infrastructure::config::RateLimitConfig;

/// Allows at most `max_actions` per user within any `window`.
///
/// Rejected attempts are not recorded, so a user who keeps clicking
/// is let back in as soon as their oldest accepted action expires.
pub struct RateLimiter {
    max_actions: usize,
    window: Duration,
    actions: Mutex<HashMap<UserId, VecDeque<Instant>>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_actions: usize, window: Duration) -> Self {
        Self {
            max_actions,
            window,
            actions: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn from_config(config: RateLimitConfig) -> Self {
        Self::new(config.max_actions, Duration::from_secs(config.window_secs))
    }

    /// Records an action for `user` if the limit allows it.
    pub fn check(&self, user: UserId) -> bool {
        self.check_at(user, Instant::now())
    }

    /// Same as [`Self::check`] with an explicit clock reading.
    pub fn check_at(&self, user: UserId, now: Instant) -> bool {
        let mut actions = self.actions.lock();
        let stamps = actions.entry(user).or_default();

        while stamps
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= self.window)
        {
            stamps.pop_front();
        }

        if stamps.len() >= self.max_actions {
            tracing::debug!(user = %user, count = stamps.len(), "Rate limit exceeded");
            return false;
        }

        stamps.push_back(now);
        true
    }

    /// Drops users whose every action has expired.
    pub fn prune(&self) -> usize {
        let now = Instant::now();
        let mut actions = self.actions.lock();
        let before = actions.len();
        actions.retain(|_, stamps| {
            stamps
                .back()
                .is_some_and(|t| now.saturating_duration_since(*t) < self.window)
        });
        before - actions.len()
    }

    /// Number of users currently tracked.
    #[must_use]
    pub fn tracked_users(&self) -> usize {
        self.actions.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(10, WINDOW);
        let start = Instant::now();
        for i in 0..10 {
            assert!(limiter.check_at(UserId(1), start + Duration::from_secs(i)));
        }
        assert!(!limiter.check_at(UserId(1), start + Duration::from_secs(10)));
    }

    #[test]
    fn test_users_are_independent() {
        let limiter = RateLimiter::new(1, WINDOW);
        let now = Instant::now();
        assert!(limiter.check_at(UserId(1), now));
        assert!(!limiter.check_at(UserId(1), now));
        assert!(limiter.check_at(UserId(2), now));
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(2, WINDOW);
        let start = Instant::now();
        assert!(limiter.check_at(UserId(1), start));
        assert!(limiter.check_at(UserId(1), start + Duration::from_secs(30)));
        assert!(!limiter.check_at(UserId(1), start + Duration::from_secs(59)));
        // First action expires at exactly one window.
        assert!(limiter.check_at(UserId(1), start + Duration::from_secs(60)));
        assert!(!limiter.check_at(UserId(1), start + Duration::from_secs(61)));
    }

    #[test]
    fn test_rejections_not_recorded() {
        let limiter = RateLimiter::new(1, WINDOW);
        let start = Instant::now();
        assert!(limiter.check_at(UserId(1), start));
        for s in 1..50 {
            assert!(!limiter.check_at(UserId(1), start + Duration::from_secs(s)));
        }
        assert!(limiter.check_at(UserId(1), start + WINDOW));
    }

    #[test]
    fn test_from_config_defaults() {
        let limiter = RateLimiter::from_config(RateLimitConfig::default());
        let now = Instant::now();
        let allowed = (0..20).filter(|_| limiter.check_at(UserId(9), now)).count();
        assert_eq!(allowed, 10);
        assert_eq!(limiter.tracked_users(), 1);
    }
}
