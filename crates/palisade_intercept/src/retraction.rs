//! # Retraction Engine
//!
//! Removes already-delivered messages from every client's visible
//! scroll-back, after the fact.
//!
//! ## How a retraction lands
//!
//! ```text
//! retract(mode, id)
//!   └─ tick thread: for every known client log
//!        1. suppress capture for the client        (RAII guard)
//!        2. under the client's log lock:
//!           scan for "<prefix>_<id>" markers
//!           none matched → leave untouched, deliver nothing
//!           else: blanks + survivors = exactly one window
//!                 connected? replay the window through the outbound path
//!                 replace the stored log either way
//!        3. guard drops, capture resumes
//! ```
//!
//! The replay rides the same outbound path ordinary chat uses, which is
//! why step 1 exists: without it the capture hook would append each
//! replayed payload back into the log it reconstructs.

use std::sync::Arc;

use palisade_core::{MessageId, RemoveMode, BLANK_PAYLOAD, HISTORY_WINDOW};

use crate::history::ChatHistory;
use crate::integration::{PacketTransport, TickScheduler};

/// Retroactively retracts delivered chat messages.
pub struct RetractionEngine {
    history: Arc<ChatHistory>,
    transport: Arc<dyn PacketTransport>,
    scheduler: Arc<dyn TickScheduler>,
}

impl RetractionEngine {
    /// Creates the engine over its collaborators.
    #[must_use]
    pub fn new(
        history: Arc<ChatHistory>,
        transport: Arc<dyn PacketTransport>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Self {
        Self {
            history,
            transport,
            scheduler,
        }
    }

    /// Retracts the message(s) marked with `id` from every client.
    ///
    /// Fire-and-forget: the batch runs on the tick thread. Retracting a
    /// marker nobody carries is a no-op.
    pub fn retract(&self, mode: RemoveMode, id: MessageId) {
        let marker = mode.marker(&id);
        let history = Arc::clone(&self.history);
        let transport = Arc::clone(&self.transport);
        self.scheduler.schedule(Box::new(move || {
            run_batch(&history, transport.as_ref(), &marker);
        }));
    }
}

/// Scans and rewrites every client log for one marker.
fn run_batch(history: &ChatHistory, transport: &dyn PacketTransport, marker: &str) {
    for client in history.clients() {
        let Some(_guard) = history.suppress(&client) else {
            // an overlapping retraction is already replaying this client
            continue;
        };

        let replaced = history.rewrite(&client, |entries| {
            let survivors: Vec<String> = entries
                .iter()
                .filter(|payload| !payload.contains(marker))
                .cloned()
                .collect();
            if survivors.len() == entries.len() {
                return None;
            }

            let mut replacement: Vec<String> = Vec::with_capacity(HISTORY_WINDOW);
            replacement.resize(HISTORY_WINDOW - survivors.len(), BLANK_PAYLOAD.to_string());
            replacement.extend(survivors);

            // A disconnected client gets no replay, but its stored log is
            // still replaced: there is nothing to retract on reconnect.
            if transport.is_connected(&client) {
                for payload in &replacement {
                    if let Err(err) = transport.send_chat(&client, payload) {
                        tracing::warn!("chat replay to {client} aborted: {err}");
                        break;
                    }
                }
            }
            Some(replacement)
        });

        if replaced {
            tracing::debug!("retracted {marker} from {client}");
        }
    }
}
