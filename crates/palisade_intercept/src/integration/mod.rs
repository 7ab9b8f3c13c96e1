//! # Integration Seams
//!
//! The interception layer never talks to the server directly. Every
//! collaborator — transport, player directory, permission oracle, tick
//! scheduler — is a trait defined here and implemented by the host.
//!
//! Mock implementations live beside the traits so component and
//! integration tests can drive the layer without a real server.

mod scheduler;
mod traits;

pub use scheduler::{InlineScheduler, QueuedScheduler};
pub use traits::{
    Capability, InboundHandler, MockDirectory, MockOracle, MockTransport, OutboundHandler,
    PacketTransport, PermissionOracle, PlayerDirectory, TickScheduler,
};
