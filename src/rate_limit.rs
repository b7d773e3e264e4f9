use crate::config::RateLimit;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;
use tracing::warn;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per client key.
#[derive(Debug)]
pub struct RateLimiter {
    limit: RateLimit,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request; false once the client has used up its window
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Forget clients whose window has passed
        windows.retain(|_, w| now.duration_since(w.started) < self.limit.window);

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if window.count >= self.limit.max_requests {
            warn!("Rate limit exceeded for {}", key);
            return false;
        }

        window.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn limiter(max_requests: u32) -> RateLimiter {
        RateLimiter::new(RateLimit {
            max_requests,
            window: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = limiter(3);
        let now = Instant::now();

        assert!(limiter.check_at("a", now));
        assert!(limiter.check_at("a", now));
        assert!(limiter.check_at("a", now));
        assert!(!limiter.check_at("a", now));
    }

    #[test]
    fn test_clients_are_counted_separately() {
        let limiter = limiter(1);
        let now = Instant::now();

        assert!(limiter.check_at("a", now));
        assert!(limiter.check_at("b", now));
        assert!(!limiter.check_at("a", now));
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1);
        let start = Instant::now();

        assert!(limiter.check_at("a", start));
        assert!(!limiter.check_at("a", start + Duration::from_secs(59)));
        assert!(limiter.check_at("a", start + Duration::from_secs(60)));
    }
}
