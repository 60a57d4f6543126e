//! Request statistics
//!
//! Per-client counters: total physical requests, retry attempts, and the
//! peak number of requests observed within any trailing one-second window.
//! Counters are atomics and the timestamp window sits behind a mutex, so
//! recording stays cheap and the client usable from many tasks.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Snapshot of one client's request statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    /// Physical requests issued, retries included
    pub total_requests: u64,

    /// Physical requests that were retry attempts
    pub retried_requests: u64,

    /// Highest number of requests observed within any trailing one-second
    /// window
    pub max_requests_per_second: u64,
}

/// Live counters behind one client
pub(crate) struct StatsTracker {
    total: AtomicU64,
    retried: AtomicU64,
    peak: AtomicU64,
    window: Mutex<VecDeque<Instant>>,
}

impl StatsTracker {
    pub(crate) fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            retried: AtomicU64::new(0),
            peak: AtomicU64::new(0),
            window: Mutex::new(VecDeque::new()),
        }
    }

    /// Record one physical request being issued
    pub(crate) fn record_request(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);

        let now = Instant::now();
        let mut window = match self.window.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        window.push_back(now);
        while window
            .front()
            .is_some_and(|oldest| now.duration_since(*oldest) > Duration::from_secs(1))
        {
            window.pop_front();
        }
        self.peak.fetch_max(window.len() as u64, Ordering::Relaxed);
    }

    /// Record one retry attempt
    pub(crate) fn record_retry(&self) {
        self.retried.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters
    pub(crate) fn snapshot(&self) -> ClientStats {
        ClientStats {
            total_requests: self.total.load(Ordering::Relaxed),
            retried_requests: self.retried.load(Ordering::Relaxed),
            max_requests_per_second: self.peak.load(Ordering::Relaxed),
        }
    }
}
