//! # Collaborator Traits
//!
//! What the host must provide for the interception layer to run.
//!
//! ## Architecture
//!
//! ```text
//! This crate defines:     The host implements:
//! ┌──────────────────┐    ┌──────────────────┐
//! │ PacketTransport  │ ←─ │ wire codec       │
//! │ PlayerDirectory  │ ←─ │ player registry  │
//! │ PermissionOracle │ ←─ │ permission store │
//! │ TickScheduler    │ ←─ │ main tick thread │
//! └──────────────────┘    └──────────────────┘
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use palisade_core::{ClientId, DeliveryError};

use crate::packet::{InboundPacket, OutboundPacket, PacketKind};

/// Handler for inbound events of one kind.
pub type InboundHandler = Arc<dyn Fn(&mut InboundPacket) + Send + Sync>;

/// Handler for outbound events of one kind.
pub type OutboundHandler = Arc<dyn Fn(&mut OutboundPacket) + Send + Sync>;

/// The packet transport boundary.
///
/// The transport decodes the wire, fires registered handlers with a
/// mutable view of each event before it completes, and exposes the
/// outbound chat send used for retraction replay. Replayed payloads go
/// through the same outbound event path as ordinary chat, so they hit the
/// same registered handlers.
pub trait PacketTransport: Send + Sync {
    /// Registers the handler for one inbound event kind.
    ///
    /// At most one handler per kind; registering again replaces.
    fn register_inbound(&self, kind: PacketKind, handler: InboundHandler);

    /// Registers the handler for one outbound event kind.
    ///
    /// At most one handler per kind; registering again replaces.
    fn register_outbound(&self, kind: PacketKind, handler: OutboundHandler);

    /// Sends one chat payload to one client via the outbound path.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the transport could not send.
    fn send_chat(&self, client: &ClientId, payload: &str) -> Result<(), DeliveryError>;

    /// Whether the client currently has a live connection.
    fn is_connected(&self, client: &ClientId) -> bool;
}

/// The player and identity directory.
pub trait PlayerDirectory: Send + Sync {
    /// Resolves a display token to a connected identity, if any.
    fn resolve(&self, token: &str) -> Option<ClientId>;

    /// Whether the identity is hidden (vanished) from ordinary players.
    fn is_hidden(&self, client: &ClientId) -> bool;

    /// The identity's configured nickname, already stripped of
    /// formatting, if one exists.
    fn alias_of(&self, client: &ClientId) -> Option<String>;

    /// Display names (nickname where configured) of connected players.
    ///
    /// Hidden players are included only when `include_hidden` is set.
    fn connected_names(&self, include_hidden: bool) -> Vec<String>;
}

/// Capabilities the permission oracle is asked about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Exempt from tab-complete filtering entirely.
    TabCompleteBypass,
    /// May see hidden players in completions.
    VisibilityBypass,
}

/// Boolean capability checks per identity.
pub trait PermissionOracle: Send + Sync {
    /// Whether the identity holds the capability.
    fn has_capability(&self, client: &ClientId, capability: Capability) -> bool;
}

/// Runs a task on the server's synchronous tick thread.
///
/// Retraction batches are submitted here rather than run on the caller's
/// thread, matching the host's game-state mutation model.
pub trait TickScheduler: Send + Sync {
    /// Enqueues a task for the tick thread.
    fn schedule(&self, task: Box<dyn FnOnce() + Send>);
}

// ============================================================================
// MOCK IMPLEMENTATIONS (For Testing)
// ============================================================================

/// Mock transport: stores handlers, loops `send_chat` back through the
/// registered outbound chat handler the way a real transport's send path
/// re-enters its own interception hooks.
#[derive(Default)]
pub struct MockTransport {
    inbound: Mutex<HashMap<PacketKind, InboundHandler>>,
    outbound: Mutex<HashMap<PacketKind, OutboundHandler>>,
    connected: Mutex<HashSet<ClientId>>,
    failing: Mutex<HashSet<ClientId>>,
    sent: Mutex<Vec<(ClientId, String)>>,
}

impl MockTransport {
    /// Creates a transport with no connections and no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a client as connected.
    pub fn connect(&self, client: &ClientId) {
        self.connected.lock().insert(client.clone());
    }

    /// Marks a client as disconnected.
    pub fn disconnect(&self, client: &ClientId) {
        self.connected.lock().remove(client);
    }

    /// Makes every future send to this client fail.
    pub fn fail_delivery(&self, client: &ClientId) {
        self.failing.lock().insert(client.clone());
    }

    /// Feeds an inbound event through its registered handler.
    pub fn emit_inbound(&self, mut packet: InboundPacket) -> InboundPacket {
        let handler = self.inbound.lock().get(&packet.kind()).cloned();
        if let Some(handler) = handler {
            handler(&mut packet);
        }
        packet
    }

    /// Feeds an outbound event through its registered handler.
    pub fn emit_outbound(&self, mut packet: OutboundPacket) -> OutboundPacket {
        let handler = self.outbound.lock().get(&packet.kind()).cloned();
        if let Some(handler) = handler {
            handler(&mut packet);
        }
        packet
    }

    /// Everything sent to one client, in send order.
    #[must_use]
    pub fn sent_to(&self, client: &ClientId) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(to, _)| to == client)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Total number of sends across all clients.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Forgets everything sent so far.
    pub fn clear_sent(&self) {
        self.sent.lock().clear();
    }
}

impl PacketTransport for MockTransport {
    fn register_inbound(&self, kind: PacketKind, handler: InboundHandler) {
        self.inbound.lock().insert(kind, handler);
    }

    fn register_outbound(&self, kind: PacketKind, handler: OutboundHandler) {
        self.outbound.lock().insert(kind, handler);
    }

    fn send_chat(&self, client: &ClientId, payload: &str) -> Result<(), DeliveryError> {
        if self.failing.lock().contains(client) {
            return Err(DeliveryError {
                client: client.to_string(),
                reason: "simulated send failure".to_string(),
            });
        }
        if !self.is_connected(client) {
            return Err(DeliveryError {
                client: client.to_string(),
                reason: "not connected".to_string(),
            });
        }
        self.sent.lock().push((client.clone(), payload.to_string()));

        // The wire send is itself an outbound chat event: re-enter the hook
        // exactly like a real transport would.
        let _ = self.emit_outbound(OutboundPacket::ChatDelivery(crate::packet::ChatDelivery {
            client: client.clone(),
            payload: payload.to_string(),
        }));
        Ok(())
    }

    fn is_connected(&self, client: &ClientId) -> bool {
        self.connected.lock().contains(client)
    }
}

/// One entry in the mock directory.
#[derive(Clone, Debug, Default)]
struct MockPlayer {
    hidden: bool,
    alias: Option<String>,
}

/// Mock player directory backed by a map.
#[derive(Default)]
pub struct MockDirectory {
    players: Mutex<HashMap<ClientId, MockPlayer>>,
}

impl MockDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a visible player with no nickname.
    pub fn add_player(&self, name: &str) -> ClientId {
        let client = ClientId::new(name);
        self.players
            .lock()
            .insert(client.clone(), MockPlayer::default());
        client
    }

    /// Marks a player hidden.
    pub fn hide(&self, client: &ClientId) {
        if let Some(player) = self.players.lock().get_mut(client) {
            player.hidden = true;
        }
    }

    /// Gives a player a nickname.
    pub fn set_alias(&self, client: &ClientId, alias: &str) {
        if let Some(player) = self.players.lock().get_mut(client) {
            player.alias = Some(alias.to_string());
        }
    }
}

impl PlayerDirectory for MockDirectory {
    fn resolve(&self, token: &str) -> Option<ClientId> {
        self.players
            .lock()
            .keys()
            .find(|client| client.name().eq_ignore_ascii_case(token))
            .cloned()
    }

    fn is_hidden(&self, client: &ClientId) -> bool {
        self.players
            .lock()
            .get(client)
            .is_some_and(|player| player.hidden)
    }

    fn alias_of(&self, client: &ClientId) -> Option<String> {
        self.players.lock().get(client)?.alias.clone()
    }

    fn connected_names(&self, include_hidden: bool) -> Vec<String> {
        self.players
            .lock()
            .iter()
            .filter(|(_, player)| include_hidden || !player.hidden)
            .map(|(client, player)| {
                player
                    .alias
                    .clone()
                    .unwrap_or_else(|| client.name().to_string())
            })
            .collect()
    }
}

/// Mock permission oracle granting explicitly listed capabilities.
#[derive(Default)]
pub struct MockOracle {
    grants: Mutex<HashSet<(ClientId, Capability)>>,
}

impl MockOracle {
    /// Creates an oracle that grants nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants one capability to one identity.
    pub fn grant(&self, client: &ClientId, capability: Capability) {
        self.grants.lock().insert((client.clone(), capability));
    }
}

impl PermissionOracle for MockOracle {
    fn has_capability(&self, client: &ClientId, capability: Capability) -> bool {
        self.grants.lock().contains(&(client.clone(), capability))
    }
}
