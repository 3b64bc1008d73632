use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fixed-window request counter keyed by client IP.
///
/// In-process only: counters reset on restart, so this is a best-effort
/// guard on the billing endpoints, not an enforcement boundary.
pub struct RateLimiter {
    window: Duration,
    max_per_window: u32,
    hits: Mutex<HashMap<IpAddr, (Instant, u32)>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_per_window: u32) -> Self {
        Self {
            window,
            max_per_window: max_per_window.max(1),
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(max_per_window: u32) -> Self {
        Self::new(Duration::from_secs(60), max_per_window)
    }

    /// Record a hit and report whether the caller is still under the limit.
    pub fn allow(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut guard = self.hits.lock().expect("rate limit mutex poisoned");

        // Keep the map from growing without bound.
        if guard.len() > 10_000 {
            let window = self.window;
            guard.retain(|_, (started, _)| now.duration_since(*started) < window);
        }

        let entry = guard.entry(ip).or_insert((now, 0));
        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }
        entry.1 += 1;
        entry.1 <= self.max_per_window
    }
}
