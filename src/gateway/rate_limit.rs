// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fixed-window request counting per client.
//!
//! A client's window opens on its first request and lasts `window`. Up to
//! `max_requests` pass inside it; the rest are refused until it closes. The
//! next request after that opens a fresh window. Closed windows are swept
//! at most once per window length, on whichever request comes due.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::debug;

use crate::clock::Clock;
use crate::config::{duration_from_secs, RateLimitConfig};

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Windows {
    clients: HashMap<String, Window>,
    next_sweep: DateTime<Utc>,
}

impl Windows {
    fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, window| now < window.reset_at);
        before - self.clients.len()
    }
}

pub struct RateLimiter {
    windows: Mutex<Windows>,
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .field("clients", &self.tracked_clients())
            .finish()
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        let next_sweep = clock.now() + window;
        Self {
            windows: Mutex::new(Windows {
                clients: HashMap::new(),
                next_sweep,
            }),
            max_requests,
            window,
            clock,
        }
    }

    pub fn from_config(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            config.max_requests,
            duration_from_secs(config.window_secs),
            clock,
        )
    }

    /// Count one request from `client`.
    ///
    /// `Err` carries the whole seconds until the window resets, at least 1.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        let now = self.clock.now();
        let mut windows = self.windows.lock();

        if now >= windows.next_sweep {
            let dropped = windows.sweep(now);
            windows.next_sweep = now + self.window;
            if dropped > 0 {
                debug!(dropped, "rate limiter forgot idle clients");
            }
        }

        if let Some(window) = windows.clients.get_mut(client) {
            if now < window.reset_at {
                if window.count >= self.max_requests {
                    let remaining = (window.reset_at - now).num_milliseconds().max(0) as u64;
                    return Err(remaining.div_ceil(1000).max(1));
                }
                window.count += 1;
                return Ok(());
            }
        }

        windows.clients.insert(
            client.to_string(),
            Window {
                count: 1,
                reset_at: now + self.window,
            },
        );
        Ok(())
    }

    /// Forget clients whose window has closed. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        self.windows.lock().sweep(now)
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().clients.len()
    }
}
