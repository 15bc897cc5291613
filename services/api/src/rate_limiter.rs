//! Throttling of admin login attempts

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimiterConfig {
    /// Attempts allowed inside one window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Lockout in seconds once the attempts are used up
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,
            ban_duration_seconds: 900,
        }
    }
}

#[derive(Debug)]
struct Attempts {
    count: u32,
    window_start: Instant,
    banned_until: Option<Instant>,
}

impl Attempts {
    fn is_live(&self, now: Instant, window: Duration) -> bool {
        match self.banned_until {
            Some(until) => now < until,
            None => now.duration_since(self.window_start) < window,
        }
    }
}

/// Per-key attempt counter with a temporary lockout
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, Attempts>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for `key`; false while the key is locked out
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_seconds);

        entries.retain(|_, attempts| attempts.is_live(now, window));

        let entry = entries.entry(key.to_string()).or_insert(Attempts {
            count: 0,
            window_start: now,
            banned_until: None,
        });

        if let Some(until) = entry.banned_until {
            if now < until {
                return false;
            }
            entry.banned_until = None;
            entry.count = 0;
            entry.window_start = now;
        }

        if now.duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.config.max_attempts {
            entry.banned_until = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            warn!(
                "Locked out {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        entry.count += 1;
        true
    }

    /// Forget the attempts for `key`, after a successful login
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    /// Keys with attempts still counting or a lockout still running
    pub async fn tracked_keys(&self) -> usize {
        self.entries.lock().await.len()
    }
}
