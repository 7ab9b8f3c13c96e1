//! # Palisade Intercept
//!
//! Bidirectional wire-protocol interception between a game server and its
//! connected clients.
//!
//! ## Architecture
//!
//! ```text
//! client ──► transport ──► PacketDispatcher ──► CompletionBuffer.put
//!                                │
//! server ──► transport ──► PacketDispatcher ──► TabCompleteFilter ──► client
//!                                │
//! server ──► transport ──► PacketDispatcher ──► ChatCapture ──► ChatHistory
//!                                                                   ▲
//! moderation ──► RetractionEngine ── tick thread ── replay ─────────┘
//! ```
//!
//! Two independent exchanges share the transport:
//!
//! - **Tab-complete**: the legacy protocol answers a client's free-form
//!   request with candidates but no correlation id. The buffer remembers
//!   the last request per client; the filter consumes that memory when the
//!   response goes out and rewrites the candidates (visibility, allow-list,
//!   nicknames, stable case-insensitive order).
//! - **Chat retraction**: every delivered chat payload is recorded per
//!   client, bounded to the client's rendering depth. A retraction rebuilds
//!   each affected client's scroll-back without the targeted payloads,
//!   pads it back to full depth, and replays it — suppressing its own
//!   capture hook for the duration.
//!
//! ## Concurrency Model
//!
//! Handlers for different clients run in parallel; state per client is
//! guarded by a per-client lock. Retraction batches run as tasks on the
//! host's tick thread via [`TickScheduler`], but remain correct under a
//! threaded host because every rewrite holds the same per-client lock the
//! capture path uses.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod capture;
pub mod correlation;
pub mod dispatch;
pub mod filter;
pub mod history;
pub mod integration;
pub mod packet;
pub mod retraction;

// Re-exports for convenience
pub use capture::ChatCapture;
pub use correlation::CompletionBuffer;
pub use dispatch::PacketDispatcher;
pub use filter::TabCompleteFilter;
pub use history::{ChatHistory, SuppressGuard};
pub use integration::{
    Capability, InlineScheduler, MockDirectory, MockOracle, MockTransport, PacketTransport,
    PermissionOracle, PlayerDirectory, QueuedScheduler, TickScheduler,
};
pub use packet::{
    ChatDelivery, InboundPacket, OutboundPacket, PacketKind, Suggestion, TabCompleteRequest,
    TabCompleteResponse,
};
pub use retraction::RetractionEngine;

use std::sync::Arc;

use palisade_core::{ConfigError, InterceptConfig, MessageId, RemoveMode};

/// The assembled interception layer.
///
/// Owns every component, registers the dispatcher with the transport on
/// construction, and exposes the host-facing operations.
pub struct Interceptor {
    correlation: Arc<CompletionBuffer>,
    retraction: RetractionEngine,
}

impl Interceptor {
    /// Builds the layer over the host's collaborators and hooks it into
    /// the transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the allow-list fails to compile.
    pub fn new(
        config: InterceptConfig,
        transport: Arc<dyn PacketTransport>,
        directory: Arc<dyn PlayerDirectory>,
        permissions: Arc<dyn PermissionOracle>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Result<Self, ConfigError> {
        let allow_list = config.compile_allow_list()?;
        let correlation = Arc::new(CompletionBuffer::new());
        let history = Arc::new(ChatHistory::new());

        let filter = Arc::new(TabCompleteFilter::new(
            Arc::clone(&correlation),
            directory,
            permissions,
            config.tab_complete.clone(),
            allow_list,
        ));
        let capture = Arc::new(ChatCapture::new(Arc::clone(&history)));

        let dispatcher =
            PacketDispatcher::new(config, Arc::clone(&correlation), filter, capture);
        dispatcher.register(transport.as_ref());

        let retraction = RetractionEngine::new(history, transport, scheduler);

        Ok(Self {
            correlation,
            retraction,
        })
    }

    /// Retracts the message(s) marked with `id` from every client.
    ///
    /// Fire-and-forget; the batch runs on the tick thread.
    pub fn retract(&self, mode: RemoveMode, id: MessageId) {
        self.retraction.retract(mode, id);
    }

    /// Reclaims expired tab-complete correlations. Optional tick hook.
    pub fn purge_expired(&self) {
        self.correlation.purge_expired();
    }
}
