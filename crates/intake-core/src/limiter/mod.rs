//! Rate-limit storage guard
//!
//! A [`Limiter`] hands out permits from a [`Storage`] backend. Before use it
//! checks that the backend is reachable; an unusable backend is a
//! configuration error unless fallback is enabled, in which case the limiter
//! degrades to in-process buckets and says so in the logs.
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

pub mod rate;
pub mod storage;

pub use rate::{Granularity, RateLimit};
pub use storage::{Acquire, MemoryStorage, Storage};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Message used when the storage health check fails
pub const STORAGE_UNAVAILABLE: &str = "Invalid or inaccessible storage configuration";

/// Limiter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Enforce limits at all
    pub enabled: bool,
    /// Switch to in-memory buckets when the storage check fails
    pub fallback_enabled: bool,
    /// Limit applied by [`Limiter::hit`]
    pub default_limit: Option<RateLimit>,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback_enabled: false,
            default_limit: None,
        }
    }
}

/// Rate limiter over a pluggable storage backend
#[derive(Debug)]
pub struct Limiter {
    config: LimiterConfig,
    storage: Arc<dyn Storage>,
    fallback: MemoryStorage,
    using_fallback: AtomicBool,
}

impl Limiter {
    pub fn new(config: LimiterConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            storage,
            fallback: MemoryStorage::new(),
            using_fallback: AtomicBool::new(false),
        }
    }

    /// A limiter backed by in-process buckets
    pub fn in_memory(config: LimiterConfig) -> Self {
        Self::new(config, Arc::new(MemoryStorage::new()))
    }

    /// Build the limiter and run the storage check
    pub fn init(config: LimiterConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let limiter = Self::new(config, storage);
        limiter.check_storage()?;
        Ok(limiter)
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Verify the storage backend is usable.
    ///
    /// Disabled limiters skip the check.
    pub fn check_storage(&self) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        debug!("Starting to check '{}' rate limit storage", self.storage.name());
        if self.storage.check() {
            self.using_fallback.store(false, Ordering::SeqCst);
            debug!("Rate limit storage '{}' operating correctly", self.storage.name());
            return Ok(());
        }

        if self.config.fallback_enabled {
            warn!(
                "Rate limit storage '{}' failed its check, falling back to in-memory storage",
                self.storage.name()
            );
            self.using_fallback.store(true, Ordering::SeqCst);
            return Ok(());
        }

        error!("{}", STORAGE_UNAVAILABLE);
        Err(Error::configuration(STORAGE_UNAVAILABLE))
    }

    pub fn is_using_fallback(&self) -> bool {
        self.using_fallback.load(Ordering::SeqCst)
    }

    /// Name of the backend currently handing out permits
    pub fn storage_name(&self) -> &str {
        self.active_storage().name()
    }

    fn active_storage(&self) -> &dyn Storage {
        if self.is_using_fallback() {
            &self.fallback
        } else {
            self.storage.as_ref()
        }
    }

    /// Take one permit for `key` under the default limit
    pub fn hit(&self, key: &str) -> Result<()> {
        match self.config.default_limit {
            Some(limit) => self.hit_with(key, &limit),
            None => Ok(()),
        }
    }

    /// Take one permit for `key` under `limit`
    pub fn hit_with(&self, key: &str, limit: &RateLimit) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        match self.active_storage().acquire(key, limit) {
            Acquire::Granted { remaining } => {
                debug!("Rate limit '{}' for '{}': {} remaining", limit, key, remaining);
                Ok(())
            }
            Acquire::Denied { retry_after } => {
                debug!("Rate limit '{}' exhausted for '{}'", limit, key);
                Err(Error::RateLimited {
                    key: key.to_string(),
                    retry_after,
                })
            }
        }
    }
}
