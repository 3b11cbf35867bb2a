use governor::{
    clock::{Clock, DefaultClock},
    state::direct::NotKeyed,
    state::InMemoryState,
    Quota, RateLimiter as GovernorRateLimiter,
};
use std::collections::HashMap;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio::sync::RwLock;

/// Rate limiter for authentication attempts.
///
/// Tracks login attempts per email address. Default: 5 attempts per
/// 15 minutes.
#[derive(Clone)]
pub struct AuthRateLimiter {
    limiters: Arc<
        RwLock<HashMap<String, Arc<GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>>>>,
    >,
    max_attempts: u32,
    window_minutes: u64,
}

impl AuthRateLimiter {
    pub fn new() -> Self {
        Self::with_config(5, 15)
    }

    pub fn with_config(max_attempts: u32, window_minutes: u64) -> Self {
        Self {
            limiters: Arc::new(RwLock::new(HashMap::new())),
            max_attempts,
            window_minutes,
        }
    }

    /// Consume one attempt for this email. Returns Err with the wait time
    /// when the budget is exhausted.
    pub async fn check(&self, email: &str) -> Result<(), Duration> {
        let email = email.to_lowercase();

        let limiter = {
            let mut limiters = self.limiters.write().await;

            limiters
                .entry(email.clone())
                .or_insert_with(|| {
                    let quota = Quota::with_period(Duration::from_secs(self.window_minutes * 60))
                        .unwrap()
                        .allow_burst(NonZeroU32::new(self.max_attempts).unwrap());

                    Arc::new(GovernorRateLimiter::direct(quota))
                })
                .clone()
        };

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(negative) => {
                let wait_duration = negative.wait_time_from(DefaultClock::default().now());
                Err(wait_duration)
            }
        }
    }

    /// Reset rate limit for an email (after successful login).
    pub async fn reset(&self, email: &str) {
        let email = email.to_lowercase();
        let mut limiters = self.limiters.write().await;
        limiters.remove(&email);
    }

    /// Drop limiters that are no longer rate limiting, to bound memory.
    pub async fn cleanup(&self) {
        let mut limiters = self.limiters.write().await;
        limiters.retain(|_, limiter| limiter.check().is_err());
    }
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_max_attempts() {
        let limiter = AuthRateLimiter::with_config(3, 15);

        assert!(limiter.check("op@example.com").await.is_ok());
        assert!(limiter.check("op@example.com").await.is_ok());
        assert!(limiter.check("op@example.com").await.is_ok());
        assert!(limiter.check("op@example.com").await.is_err());
    }

    #[tokio::test]
    async fn emails_are_tracked_independently() {
        let limiter = AuthRateLimiter::with_config(1, 15);

        assert!(limiter.check("a@example.com").await.is_ok());
        assert!(limiter.check("a@example.com").await.is_err());
        assert!(limiter.check("b@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn reset_restores_budget() {
        let limiter = AuthRateLimiter::with_config(1, 15);

        assert!(limiter.check("op@example.com").await.is_ok());
        assert!(limiter.check("op@example.com").await.is_err());

        limiter.reset("op@example.com").await;
        assert!(limiter.check("op@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn email_comparison_is_case_insensitive() {
        let limiter = AuthRateLimiter::with_config(1, 15);

        assert!(limiter.check("Op@Example.com").await.is_ok());
        assert!(limiter.check("op@example.com").await.is_err());
    }
}
