//! # Retraction Modes & Wire Markers
//!
//! A retractable chat payload carries a hidden marker of the form
//! `<prefix>_<message id>` somewhere in its serialized text. The prefix
//! decides the blast radius of a later retraction: one exact message, or
//! every message tagged with the sender's id. The scan itself is identical
//! either way; the producer chose the radius at send time by choosing the
//! prefix.
//!
//! **CRITICAL:** prefixes and the blank placeholder are wire contracts with
//! message producers and with the client's renderer. They must stay
//! bit-exact.

use uuid::Uuid;

use crate::error::ModeParseError;

/// Canonical 128-bit message identifier embedded in markers.
///
/// The wire form is the hyphenated lowercase textual rendering.
pub type MessageId = Uuid;

/// The minimal empty-text payload the client renders as a blank line.
///
/// Used to left-pad a retraction replay up to the full window so the
/// client's scroll-back keeps its expected depth.
pub const BLANK_PAYLOAD: &str = "{\"text\": \" \"}";

/// Blast radius of a retraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemoveMode {
    /// Remove only the message carrying this exact id.
    SpecificMessage,
    /// Remove every message tagged as originating from this sender.
    AllFromSender,
}

impl RemoveMode {
    /// Marker prefix embedded by producers for this mode.
    #[inline]
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::SpecificMessage => "flpm",
            Self::AllFromSender => "flps",
        }
    }

    /// Stable key used where the mode crosses a text boundary (commands,
    /// config).
    #[inline]
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SpecificMessage => "SPECIFIC_MESSAGE",
            Self::AllFromSender => "ALL_MESSAGES_FROM_SENDER",
        }
    }

    /// Parses a mode from its key, case-insensitively.
    ///
    /// # Errors
    ///
    /// Unknown keys are a caller bug and fail loudly, never a silent no-op.
    pub fn from_key(key: &str) -> Result<Self, ModeParseError> {
        if key.eq_ignore_ascii_case(Self::SpecificMessage.key()) {
            Ok(Self::SpecificMessage)
        } else if key.eq_ignore_ascii_case(Self::AllFromSender.key()) {
            Ok(Self::AllFromSender)
        } else {
            Err(ModeParseError::UnknownMode(key.to_string()))
        }
    }

    /// Renders the marker substring scanned for during retraction.
    #[must_use]
    pub fn marker(self, id: &MessageId) -> String {
        format!("{}_{}", self.prefix(), id)
    }
}
