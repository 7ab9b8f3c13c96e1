//! # Chat Capture Hook
//!
//! Sits on the outbound chat path and records every delivered payload
//! into [`ChatHistory`]. Deliberately thin: the history owns the data and
//! the suppression rule; this hook just feeds it.

use std::sync::Arc;

use crate::history::ChatHistory;
use crate::packet::ChatDelivery;

/// Records outbound chat deliveries.
pub struct ChatCapture {
    history: Arc<ChatHistory>,
}

impl ChatCapture {
    /// Creates the hook over the shared history.
    #[must_use]
    pub fn new(history: Arc<ChatHistory>) -> Self {
        Self { history }
    }

    /// Records one delivery. No-op while the client is under replay.
    pub fn record(&self, delivery: &ChatDelivery) {
        self.history.record(&delivery.client, &delivery.payload);
    }
}
