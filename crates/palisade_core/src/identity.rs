//! # Client Identity
//!
//! The opaque token one connected client is known by for its session.
//!
//! ## Design
//!
//! - The identity directory owns naming; we only read it
//! - Display names are unique per session, which is all the maps need
//! - Cheap to clone: identities key shared maps and cross tick-task
//!   boundaries

use std::fmt;
use std::sync::Arc;

/// Session-lifetime identity of one connected client.
///
/// Backed by the client's display name. Not globally unique across
/// restarts, and not required to be.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(Arc<str>);

impl ClientId {
    /// Creates an identity from a display name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The display name this identity was created from.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClientId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_identity_equality() {
        let a = ClientId::new("Herobrine");
        let b = ClientId::from("Herobrine");
        let c = ClientId::new("herobrine");

        assert_eq!(a, b);
        assert_ne!(a, c); // display names are case-significant
    }

    #[test]
    fn test_identity_as_map_key() {
        let mut map = HashMap::new();
        map.insert(ClientId::new("alice"), 1u32);
        map.insert(ClientId::new("alice"), 2u32);

        assert_eq!(map.len(), 1);
        assert_eq!(map[&ClientId::new("alice")], 2);
    }

    #[test]
    fn test_display_roundtrip() {
        let id = ClientId::new("Notch");
        assert_eq!(id.to_string(), "Notch");
        assert_eq!(id.name(), "Notch");
    }
}
