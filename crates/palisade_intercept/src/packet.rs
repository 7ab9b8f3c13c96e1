//! # Intercepted Packet Events
//!
//! Typed views of the transport events this layer cares about. The
//! transport owns decoding and encoding; by the time an event reaches us
//! the relevant fields are readable and, for outbound events, writable
//! until the event completes.

use palisade_core::ClientId;

/// The distinct event kinds the dispatcher registers for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// Client asked for completions of partially typed text.
    TabCompleteRequest,
    /// Server answered with candidate completions.
    TabCompleteResponse,
    /// Server delivered a chat payload to a client.
    ChatDelivery,
}

/// One candidate completion in a tab-complete response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// The text shown to (and insertable by) the client.
    pub text: String,
}

impl Suggestion {
    /// Creates a suggestion from its display text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Inbound tab-complete request: the client's partially typed text.
#[derive(Clone, Debug)]
pub struct TabCompleteRequest {
    /// Requesting client.
    pub client: ClientId,
    /// The raw text the client has typed so far.
    pub text: String,
}

/// Outbound tab-complete response, mutable until the event completes.
#[derive(Clone, Debug)]
pub struct TabCompleteResponse {
    client: ClientId,
    suggestions: Vec<Suggestion>,
    cancelled: bool,
}

impl TabCompleteResponse {
    /// Creates a response carrying the server's candidates.
    #[must_use]
    pub fn new(client: ClientId, suggestions: Vec<Suggestion>) -> Self {
        Self {
            client,
            suggestions,
            cancelled: false,
        }
    }

    /// The client this response is addressed to.
    #[inline]
    #[must_use]
    pub fn client(&self) -> &ClientId {
        &self.client
    }

    /// The current candidate list.
    #[inline]
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Mutable access to the candidate list.
    #[inline]
    pub fn suggestions_mut(&mut self) -> &mut Vec<Suggestion> {
        &mut self.suggestions
    }

    /// Cancels delivery of this response entirely.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether delivery has been cancelled.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Outbound chat delivery: one serialized payload on its way to a client.
#[derive(Clone, Debug)]
pub struct ChatDelivery {
    /// Receiving client.
    pub client: ClientId,
    /// The serialized chat content unit, opaque to this layer.
    pub payload: String,
}

/// An inbound event routed by kind.
#[derive(Clone, Debug)]
pub enum InboundPacket {
    /// A tab-complete request.
    TabCompleteRequest(TabCompleteRequest),
}

impl InboundPacket {
    /// The kind this event routes under.
    #[must_use]
    pub const fn kind(&self) -> PacketKind {
        match self {
            Self::TabCompleteRequest(_) => PacketKind::TabCompleteRequest,
        }
    }
}

/// An outbound event routed by kind.
#[derive(Clone, Debug)]
pub enum OutboundPacket {
    /// A tab-complete response.
    TabCompleteResponse(TabCompleteResponse),
    /// A chat delivery.
    ChatDelivery(ChatDelivery),
}

impl OutboundPacket {
    /// The kind this event routes under.
    #[must_use]
    pub const fn kind(&self) -> PacketKind {
        match self {
            Self::TabCompleteResponse(_) => PacketKind::TabCompleteResponse,
            Self::ChatDelivery(_) => PacketKind::ChatDelivery,
        }
    }
}
