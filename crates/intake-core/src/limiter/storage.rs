//! Rate limit storage backends
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use super::rate::RateLimit;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Result of trying to take a permit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acquire {
    /// Permit taken; `remaining` whole permits are left in the window
    Granted { remaining: u32 },
    /// No permit available until `retry_after` has passed
    Denied { retry_after: Duration },
}

impl Acquire {
    pub fn is_granted(&self) -> bool {
        matches!(self, Acquire::Granted { .. })
    }
}

/// Where rate limit counters live
pub trait Storage: Send + Sync + fmt::Debug {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Whether the backend is reachable and usable
    fn check(&self) -> bool;

    /// Take one permit for `key` under `limit`
    fn acquire(&self, key: &str, limit: &RateLimit) -> Acquire;

    /// Forget every counter
    fn reset(&self);
}

/// Token bucket for one key and limit
#[derive(Debug)]
struct TokenBucket {
    /// Current number of tokens
    tokens: f64,
    /// Maximum number of tokens
    capacity: f64,
    /// Tokens regained per second
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(limit: &RateLimit) -> Self {
        Self {
            tokens: f64::from(limit.amount),
            capacity: f64::from(limit.amount),
            refill_rate: limit.refill_rate(),
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();

        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }

    fn try_consume(&mut self) -> Acquire {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Acquire::Granted {
                remaining: self.tokens.floor() as u32,
            }
        } else {
            let needed = 1.0 - self.tokens;
            Acquire::Denied {
                retry_after: Duration::from_secs_f64(needed / self.refill_rate),
            }
        }
    }
}

/// In-process token buckets keyed by limit and key
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live buckets
    pub fn len(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn check(&self) -> bool {
        self.buckets.lock().is_ok()
    }

    fn acquire(&self, key: &str, limit: &RateLimit) -> Acquire {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        buckets
            .entry(format!("{}/{}", limit, key))
            .or_insert_with(|| TokenBucket::new(limit))
            .try_consume()
    }

    fn reset(&self) {
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}
