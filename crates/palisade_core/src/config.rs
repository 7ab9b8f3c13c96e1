//! # Options Bag
//!
//! Immutable runtime options for the interception layer. Parsed from TOML
//! once at startup and read-only from then on; live reloading is the host's
//! problem, not ours.
//!
//! ```toml
//! enabled = true
//! protocol_version = 340
//!
//! [tab_complete]
//! prevent_below_length = 3
//! use_nicknames = true
//! allow_list = ["^/help.*", "^/msg.*"]
//! ```

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::constants::FLATTENING_PROTOCOL;
use crate::error::ConfigError;

/// Top-level options for the interception layer.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterceptConfig {
    /// Master toggle. When false, nothing registers with the transport.
    pub enabled: bool,

    /// Protocol version the server speaks to its clients.
    ///
    /// Decides whether the legacy tab-complete subsystem applies at all.
    pub protocol_version: u32,

    /// Tab-complete filtering options.
    pub tab_complete: TabCompleteConfig,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // 1.12.2, the last protocol with client-texted completions
            protocol_version: 340,
            tab_complete: TabCompleteConfig::default(),
        }
    }
}

/// Options for the tab-complete filter pipeline.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TabCompleteConfig {
    /// Cancel command-form responses whose typed command is shorter than
    /// this many characters. Zero disables the check.
    pub prevent_below_length: usize,

    /// Replace player-name candidates with their configured nickname when
    /// one exists.
    pub use_nicknames: bool,

    /// Patterns a command-form candidate must match to survive filtering.
    pub allow_list: Vec<String>,
}

impl InterceptConfig {
    /// Loads options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it does not match the schema.
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// True when the legacy tab-complete mechanism applies to this
    /// protocol version.
    #[inline]
    #[must_use]
    pub const fn legacy_tab_complete(&self) -> bool {
        self.protocol_version < FLATTENING_PROTOCOL
    }

    /// Compiles the allow-list into matchable patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] naming the first invalid entry.
    pub fn compile_allow_list(&self) -> Result<PatternList, ConfigError> {
        PatternList::compile(&self.tab_complete.allow_list)
    }
}

/// A compiled set of allow-list patterns.
///
/// Patterns are operator-supplied regex, matched case-insensitively
/// anywhere in the candidate text.
#[derive(Clone, Debug, Default)]
pub struct PatternList {
    patterns: Vec<Regex>,
}

impl PatternList {
    /// Compiles pattern texts once, up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] for the first entry that fails to
    /// compile.
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::Pattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True if any pattern matches the text.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    /// True if no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
