//! # Packet Dispatcher
//!
//! The only component that touches the transport boundary. Registers one
//! handler per event kind and routes each event straight to the right
//! component. No business logic lives here; events pass through in
//! arrival order, untouched except by the component they route to.
//!
//! ## Gating
//!
//! - Master toggle off: nothing registers at all
//! - Modern protocol: completions are server-declared, so the whole
//!   tab-complete pair stays unregistered and only chat capture hooks in

use std::sync::Arc;

use palisade_core::InterceptConfig;

use crate::capture::ChatCapture;
use crate::correlation::CompletionBuffer;
use crate::filter::TabCompleteFilter;
use crate::integration::PacketTransport;
use crate::packet::{InboundPacket, OutboundPacket, PacketKind};

/// Wires interception components into the transport.
pub struct PacketDispatcher {
    config: InterceptConfig,
    correlation: Arc<CompletionBuffer>,
    filter: Arc<TabCompleteFilter>,
    capture: Arc<ChatCapture>,
}

impl PacketDispatcher {
    /// Creates the dispatcher over the components it routes to.
    #[must_use]
    pub fn new(
        config: InterceptConfig,
        correlation: Arc<CompletionBuffer>,
        filter: Arc<TabCompleteFilter>,
        capture: Arc<ChatCapture>,
    ) -> Self {
        Self {
            config,
            correlation,
            filter,
            capture,
        }
    }

    /// Registers all applicable handlers with the transport.
    pub fn register(&self, transport: &dyn PacketTransport) {
        if !self.config.enabled {
            tracing::info!("packet interception disabled by config");
            return;
        }

        if self.config.legacy_tab_complete() {
            let correlation = Arc::clone(&self.correlation);
            transport.register_inbound(
                PacketKind::TabCompleteRequest,
                Arc::new(move |packet: &mut InboundPacket| {
                    let InboundPacket::TabCompleteRequest(request) = packet;
                    correlation.put(&request.client, request.text.clone());
                }),
            );

            let filter = Arc::clone(&self.filter);
            transport.register_outbound(
                PacketKind::TabCompleteResponse,
                Arc::new(move |packet: &mut OutboundPacket| {
                    if let OutboundPacket::TabCompleteResponse(response) = packet {
                        filter.filter(response);
                    }
                }),
            );
        } else {
            tracing::debug!(
                "protocol {} declares completions server-side, tab-complete hooks skipped",
                self.config.protocol_version
            );
        }

        let capture = Arc::clone(&self.capture);
        transport.register_outbound(
            PacketKind::ChatDelivery,
            Arc::new(move |packet: &mut OutboundPacket| {
                if let OutboundPacket::ChatDelivery(delivery) = packet {
                    capture.record(delivery);
                }
            }),
        );

        tracing::info!("packet interception registered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ChatHistory;
    use crate::integration::{MockDirectory, MockOracle, MockTransport};
    use crate::packet::{ChatDelivery, Suggestion, TabCompleteRequest, TabCompleteResponse};
    use palisade_core::{ClientId, PatternList};

    fn dispatcher_with(config: InterceptConfig) -> (PacketDispatcher, Arc<ChatHistory>) {
        let correlation = Arc::new(CompletionBuffer::new());
        let history = Arc::new(ChatHistory::new());
        let filter = Arc::new(TabCompleteFilter::new(
            Arc::clone(&correlation),
            Arc::new(MockDirectory::new()),
            Arc::new(MockOracle::new()),
            config.tab_complete.clone(),
            PatternList::default(),
        ));
        let capture = Arc::new(ChatCapture::new(Arc::clone(&history)));
        (
            PacketDispatcher::new(config, correlation, filter, capture),
            history,
        )
    }

    fn request(client: &ClientId, text: &str) -> InboundPacket {
        InboundPacket::TabCompleteRequest(TabCompleteRequest {
            client: client.clone(),
            text: text.to_string(),
        })
    }

    #[test]
    fn test_disabled_config_registers_nothing() {
        let (dispatcher, history) = dispatcher_with(InterceptConfig {
            enabled: false,
            ..InterceptConfig::default()
        });
        let transport = MockTransport::new();
        dispatcher.register(&transport);

        let alice = ClientId::new("alice");
        let _ = transport.emit_outbound(OutboundPacket::ChatDelivery(ChatDelivery {
            client: alice.clone(),
            payload: "hi".to_string(),
        }));

        assert!(history.snapshot(&alice).is_empty());
    }

    #[test]
    fn test_modern_protocol_skips_tab_complete_hooks() {
        let (dispatcher, history) = dispatcher_with(InterceptConfig {
            protocol_version: 393,
            tab_complete: palisade_core::TabCompleteConfig {
                prevent_below_length: 10,
                ..palisade_core::TabCompleteConfig::default()
            },
            ..InterceptConfig::default()
        });
        let transport = MockTransport::new();
        dispatcher.register(&transport);

        let alice = ClientId::new("alice");
        let _ = transport.emit_inbound(request(&alice, "/k"));
        let response = transport.emit_outbound(OutboundPacket::TabCompleteResponse(
            TabCompleteResponse::new(alice.clone(), vec![Suggestion::new("kick")]),
        ));

        // no tab-complete handler: even a too-short command survives
        let OutboundPacket::TabCompleteResponse(response) = response else {
            panic!("kind must be preserved");
        };
        assert!(!response.is_cancelled());

        // chat capture still registers on modern protocols
        let _ = transport.emit_outbound(OutboundPacket::ChatDelivery(ChatDelivery {
            client: alice.clone(),
            payload: "hi".to_string(),
        }));
        assert_eq!(history.snapshot(&alice), vec!["hi"]);
    }

    #[test]
    fn test_legacy_protocol_routes_request_to_response() {
        let (dispatcher, _history) = dispatcher_with(InterceptConfig {
            tab_complete: palisade_core::TabCompleteConfig {
                prevent_below_length: 3,
                ..palisade_core::TabCompleteConfig::default()
            },
            ..InterceptConfig::default()
        });
        let transport = MockTransport::new();
        dispatcher.register(&transport);

        let alice = ClientId::new("alice");
        let _ = transport.emit_inbound(request(&alice, "/k"));
        let response = transport.emit_outbound(OutboundPacket::TabCompleteResponse(
            TabCompleteResponse::new(alice.clone(), vec![Suggestion::new("kick")]),
        ));

        let OutboundPacket::TabCompleteResponse(response) = response else {
            panic!("kind must be preserved");
        };
        assert!(response.is_cancelled());
    }
}
