//! # Error Taxonomy
//!
//! Errors the interception layer can surface. The filtering and capture
//! paths deliberately surface none of these: a correlation miss or an
//! unresolvable candidate degrades to pass-through, never to a blocked
//! packet.

use thiserror::Error;

/// Errors loading or validating the options bag.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An allow-list entry is not a valid pattern.
    #[error("invalid allow-list pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern text.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// An unrecognized retraction mode key at a text boundary.
///
/// This is a caller bug; it must be rejected where the key enters the
/// system, never silently ignored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeParseError {
    /// The key matched no known mode.
    #[error("no such retraction mode {0:?} (expected SPECIFIC_MESSAGE or ALL_MESSAGES_FROM_SENDER)")]
    UnknownMode(String),
}

/// A failed send of one payload to one client.
///
/// Delivery failures are isolated: logged per client, never propagated
/// across the retraction batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("delivery to {client} failed: {reason}")]
pub struct DeliveryError {
    /// The client the send was addressed to.
    pub client: String,
    /// Transport-supplied reason.
    pub reason: String,
}
