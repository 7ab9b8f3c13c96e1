//! # Completion Buffer
//!
//! Connects a client's tab-complete request to the response the server
//! sends back. The legacy protocol carries no correlation id, so the only
//! link is "the most recent request text this client sent us".
//!
//! ## Design
//!
//! - One live entry per client, latest put wins
//! - Entries expire after a fixed TTL; an expired entry is never returned
//! - Expiry is lazy at read time, with an explicit sweep hook for hosts
//!   that want the memory back sooner

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use palisade_core::{ClientId, CORRELATION_TTL};

/// A request text waiting for its response.
struct Pending {
    text: String,
    inserted_at: Instant,
}

impl Pending {
    fn expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Time-expiring map from client identity to pending request text.
pub struct CompletionBuffer {
    ttl: Duration,
    pending: Mutex<HashMap<ClientId, Pending>>,
}

impl CompletionBuffer {
    /// Creates a buffer with the production TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(CORRELATION_TTL)
    }

    /// Creates a buffer with a custom TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Stores the request text for a client, replacing any earlier entry
    /// and resetting its expiry clock.
    pub fn put(&self, client: &ClientId, text: impl Into<String>) {
        let mut pending = self.pending.lock();
        pending.insert(
            client.clone(),
            Pending {
                text: text.into(),
                inserted_at: Instant::now(),
            },
        );
    }

    /// Atomically removes and returns the pending text for a client.
    ///
    /// Returns `None` if there is no entry or the entry outlived the TTL.
    #[must_use]
    pub fn take(&self, client: &ClientId) -> Option<String> {
        let mut pending = self.pending.lock();
        let entry = pending.remove(client)?;
        if entry.expired(self.ttl) {
            return None;
        }
        Some(entry.text)
    }

    /// Drops every expired entry.
    ///
    /// Optional; `take` already refuses expired entries. Hosts with a tick
    /// loop can call this to reclaim memory from abandoned requests.
    pub fn purge_expired(&self) {
        let mut pending = self.pending.lock();
        pending.retain(|_, entry| !entry.expired(self.ttl));
    }

    /// Number of live-or-expired entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// True if no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Default for CompletionBuffer {
    fn default() -> Self {
        Self::new()
    }
}
