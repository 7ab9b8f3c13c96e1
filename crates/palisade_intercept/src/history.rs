//! # Per-Client Chat History
//!
//! A bounded, ordered record of the chat payloads each client has been
//! sent, deep enough to reconstruct the client's visible scroll-back.
//!
//! ## Design
//!
//! - Sliding window of [`HISTORY_WINDOW`] payloads per client, oldest out
//! - The client map sits under an `RwLock`; each log has its own lock, so
//!   appends for different clients run in parallel while appends and
//!   rewrites for the same client exclude each other
//! - A suppression set marks clients currently being replayed to, so the
//!   replay is not captured back into the very history it is rebuilding
//!
//! `record` consults the suppression set before touching any log lock.
//! That ordering is what makes the replay path safe: the capture hook
//! re-entered during a rewrite returns without ever reaching the lock the
//! rewrite is holding.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use palisade_core::{ClientId, HISTORY_WINDOW};

/// One client's delivered-payload log.
type Log = Arc<Mutex<VecDeque<String>>>;

/// Bounded per-client record of delivered chat payloads.
pub struct ChatHistory {
    logs: RwLock<HashMap<ClientId, Log>>,
    suppressed: Mutex<HashSet<ClientId>>,
}

impl ChatHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
            suppressed: Mutex::new(HashSet::new()),
        }
    }

    /// Appends a delivered payload to a client's log.
    ///
    /// No-op while the client is suppressed: payloads sent by a replay are
    /// reconstructions of entries already present, not new history.
    /// Evicts the oldest entry once the window is full.
    pub fn record(&self, client: &ClientId, payload: &str) {
        if self.is_suppressed(client) {
            return;
        }
        let log = self.log_handle(client);
        let mut log = log.lock();
        if log.len() == HISTORY_WINDOW {
            log.pop_front();
        }
        log.push_back(payload.to_string());
    }

    /// Marks a client as under replay until the guard drops.
    ///
    /// Returns `None` if the client is already suppressed, so overlapping
    /// retractions skip rather than stack.
    #[must_use]
    pub fn suppress(&self, client: &ClientId) -> Option<SuppressGuard<'_>> {
        let mut suppressed = self.suppressed.lock();
        if !suppressed.insert(client.clone()) {
            return None;
        }
        Some(SuppressGuard {
            history: self,
            client: client.clone(),
        })
    }

    /// True while a replay for this client is in flight.
    #[must_use]
    pub fn is_suppressed(&self, client: &ClientId) -> bool {
        self.suppressed.lock().contains(client)
    }

    /// Rewrites one client's log under its lock.
    ///
    /// The closure sees the current entries in order. Returning
    /// `Some(replacement)` installs the replacement; `None` leaves the log
    /// untouched. Everything the closure does (including delivering the
    /// replacement stream) happens before any concurrent append for the
    /// same client can proceed.
    ///
    /// Returns whether a replacement was installed.
    pub fn rewrite<F>(&self, client: &ClientId, rebuild: F) -> bool
    where
        F: FnOnce(&VecDeque<String>) -> Option<Vec<String>>,
    {
        let log = {
            let logs = self.logs.read();
            logs.get(client).map(Arc::clone)
        };
        let Some(log) = log else {
            return false;
        };
        let mut log = log.lock();
        match rebuild(&log) {
            Some(replacement) => {
                debug_assert_eq!(
                    replacement.len(),
                    HISTORY_WINDOW,
                    "replacement log must be exactly one window"
                );
                *log = replacement.into();
                true
            }
            None => false,
        }
    }

    /// Every client a log exists for, connected or not.
    #[must_use]
    pub fn clients(&self) -> Vec<ClientId> {
        self.logs.read().keys().cloned().collect()
    }

    /// A copy of one client's entries, oldest first.
    #[must_use]
    pub fn snapshot(&self, client: &ClientId) -> Vec<String> {
        let log = {
            let logs = self.logs.read();
            logs.get(client).map(Arc::clone)
        };
        log.map_or_else(Vec::new, |log| log.lock().iter().cloned().collect())
    }

    fn log_handle(&self, client: &ClientId) -> Log {
        {
            let logs = self.logs.read();
            if let Some(log) = logs.get(client) {
                return Arc::clone(log);
            }
        }
        let mut logs = self.logs.write();
        Arc::clone(logs.entry(client.clone()).or_default())
    }

    fn unsuppress(&self, client: &ClientId) {
        self.suppressed.lock().remove(client);
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII suppression of capture for one client.
///
/// Dropping the guard releases the suppression on every exit path,
/// including unwinding out of a failed replay.
pub struct SuppressGuard<'a> {
    history: &'a ChatHistory,
    client: ClientId,
}

impl Drop for SuppressGuard<'_> {
    fn drop(&mut self) {
        self.history.unsuppress(&self.client);
    }
}
