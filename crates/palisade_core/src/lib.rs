//! # Palisade Core
//!
//! Leaf types shared by the interception layer and its host.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - the interception crate (`palisade_intercept`)
//! - the transport or any codec crate
//!
//! Hosts embed these types in commands and config; the interception layer
//! consumes them. Keeping this crate leaf-only keeps that split honest.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod marker;

pub use config::{InterceptConfig, PatternList, TabCompleteConfig};
pub use constants::{
    COMMAND_PREFIX, CORRELATION_TTL, FLATTENING_PROTOCOL, HISTORY_WINDOW,
};
pub use error::{ConfigError, DeliveryError, ModeParseError};
pub use identity::ClientId;
pub use marker::{MessageId, RemoveMode, BLANK_PAYLOAD};
