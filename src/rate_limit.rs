//! Per-client rate limiting for the chat endpoint.
//!
//! Sliding window over request timestamps: each check drops entries older
//! than the window, then admits the request only if the client is under its
//! quota.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Sliding-window rate limiter keyed by client IP.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    requests: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request for `client` and report whether it is admitted.
    ///
    /// Denied requests are not recorded, so a throttled client regains
    /// capacity as soon as old entries age out of the window.
    pub async fn check(&self, client: IpAddr) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock().await;
        let entries = requests.entry(client).or_default();

        entries.retain(|t| now.duration_since(*t) < self.window);

        if entries.len() >= self.max_requests {
            return false;
        }

        entries.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IpAddr {
        "127.0.0.1".parse().unwrap()
    }

    #[tokio::test]
    async fn admits_up_to_the_quota() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.check(client()).await);
        assert!(limiter.check(client()).await);
        assert!(limiter.check(client()).await);
        assert!(!limiter.check(client()).await);
    }

    #[tokio::test]
    async fn clients_are_limited_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let other: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(client()).await);
        assert!(!limiter.check(client()).await);
        assert!(limiter.check(other).await);
    }

    #[tokio::test]
    async fn capacity_returns_after_the_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));

        assert!(limiter.check(client()).await);
        assert!(!limiter.check(client()).await);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.check(client()).await);
    }
}
