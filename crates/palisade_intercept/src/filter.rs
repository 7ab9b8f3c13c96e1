//! # Tab-Complete Filter Pipeline
//!
//! Consumes a correlated (request, response) pair and rewrites the
//! candidate list before the response leaves the server.
//!
//! ## Stages
//!
//! 1. Correlate: take the pending request text; none means pass-through
//! 2. Bypass: exempt clients keep the raw response
//! 3. Length gate: too-short command requests cancel the whole response
//! 4. Per candidate: hidden players and non-allow-listed command
//!    candidates drop; surviving player candidates display nickname or
//!    canonical name
//! 5. Chat form only: complete the last typed word against visible names
//! 6. Stable case-insensitive sort
//!
//! A response that never correlates, and candidate text that resolves to
//! no one, pass through untouched. That is policy, not an oversight:
//! completion must never be blocked by our own bookkeeping.

use std::sync::Arc;

use palisade_core::{PatternList, TabCompleteConfig, COMMAND_PREFIX};

use crate::correlation::CompletionBuffer;
use crate::integration::{Capability, PermissionOracle, PlayerDirectory};
use crate::packet::{Suggestion, TabCompleteResponse};

/// Filters outbound tab-complete responses.
pub struct TabCompleteFilter {
    correlation: Arc<CompletionBuffer>,
    directory: Arc<dyn PlayerDirectory>,
    permissions: Arc<dyn PermissionOracle>,
    options: TabCompleteConfig,
    allow_list: PatternList,
}

impl TabCompleteFilter {
    /// Creates the filter over its collaborators.
    ///
    /// `allow_list` is the compiled form of `options.allow_list`.
    #[must_use]
    pub fn new(
        correlation: Arc<CompletionBuffer>,
        directory: Arc<dyn PlayerDirectory>,
        permissions: Arc<dyn PermissionOracle>,
        options: TabCompleteConfig,
        allow_list: PatternList,
    ) -> Self {
        Self {
            correlation,
            directory,
            permissions,
            options,
            allow_list,
        }
    }

    /// Rewrites one outbound response in place.
    pub fn filter(&self, response: &mut TabCompleteResponse) {
        // Consume the pending request first: the correlation is spent by
        // this response whether or not filtering applies.
        let Some(request) = self.correlation.take(response.client()) else {
            return;
        };
        if self
            .permissions
            .has_capability(response.client(), Capability::TabCompleteBypass)
        {
            return;
        }

        let is_command = request.starts_with(COMMAND_PREFIX);

        let minimum = self.options.prevent_below_length;
        if is_command && minimum != 0 && request.chars().count() - 1 < minimum {
            response.cancel();
            return;
        }

        let sees_hidden = self
            .permissions
            .has_capability(response.client(), Capability::VisibilityBypass);

        response.suggestions_mut().retain_mut(|suggestion| {
            let Some(target) = self.directory.resolve(&suggestion.text) else {
                // Unresolvable text is none of our business.
                return true;
            };
            if !sees_hidden && self.directory.is_hidden(&target) {
                return false;
            }
            if is_command && !self.allowed(&suggestion.text) {
                return false;
            }
            suggestion.text = if self.options.use_nicknames {
                self.directory
                    .alias_of(&target)
                    .unwrap_or_else(|| target.name().to_string())
            } else {
                target.name().to_string()
            };
            true
        });

        if !is_command {
            self.complete_names(&request, sees_hidden, response);
        }

        response
            .suggestions_mut()
            .sort_by(|a, b| a.text.to_lowercase().cmp(&b.text.to_lowercase()));
    }

    /// Appends visible names completing the last typed word.
    fn complete_names(&self, request: &str, sees_hidden: bool, response: &mut TabCompleteResponse) {
        let word = last_token(request).to_lowercase();
        for name in self.directory.connected_names(sees_hidden) {
            if name.to_lowercase().starts_with(&word) {
                response.suggestions_mut().push(Suggestion::new(name));
            }
        }
    }

    /// An empty allow-list leaves command candidates unrestricted.
    fn allowed(&self, text: &str) -> bool {
        self.allow_list.is_empty() || self.allow_list.is_match(text)
    }
}

/// The last whitespace-delimited token, or empty if the text ends mid-gap.
fn last_token(text: &str) -> &str {
    if text.ends_with(char::is_whitespace) {
        ""
    } else {
        text.split_whitespace().last().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{MockDirectory, MockOracle};
    use palisade_core::ClientId;

    struct Fixture {
        correlation: Arc<CompletionBuffer>,
        directory: Arc<MockDirectory>,
        permissions: Arc<MockOracle>,
        requester: ClientId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                correlation: Arc::new(CompletionBuffer::new()),
                directory: Arc::new(MockDirectory::new()),
                permissions: Arc::new(MockOracle::new()),
                requester: ClientId::new("requester"),
            }
        }

        fn filter_with(&self, options: TabCompleteConfig) -> TabCompleteFilter {
            let allow_list = PatternList::compile(&options.allow_list).unwrap();
            TabCompleteFilter::new(
                Arc::clone(&self.correlation),
                Arc::clone(&self.directory) as Arc<dyn PlayerDirectory>,
                Arc::clone(&self.permissions) as Arc<dyn PermissionOracle>,
                options,
                allow_list,
            )
        }

        fn respond(&self, filter: &TabCompleteFilter, texts: &[&str]) -> TabCompleteResponse {
            let mut response = TabCompleteResponse::new(
                self.requester.clone(),
                texts.iter().map(|text| Suggestion::new(*text)).collect(),
            );
            filter.filter(&mut response);
            response
        }

        fn texts(response: &TabCompleteResponse) -> Vec<&str> {
            response
                .suggestions()
                .iter()
                .map(|s| s.text.as_str())
                .collect()
        }
    }

    #[test]
    fn test_uncorrelated_response_passes_through() {
        let fixture = Fixture::new();
        let filter = fixture.filter_with(TabCompleteConfig::default());

        let response = fixture.respond(&filter, &["zeta", "alpha"]);

        // No correlation, no filtering: order untouched, nothing cancelled.
        assert_eq!(Fixture::texts(&response), vec!["zeta", "alpha"]);
        assert!(!response.is_cancelled());
    }

    #[test]
    fn test_bypass_capability_skips_filtering() {
        let fixture = Fixture::new();
        let filter = fixture.filter_with(TabCompleteConfig::default());
        fixture
            .permissions
            .grant(&fixture.requester, Capability::TabCompleteBypass);

        fixture.correlation.put(&fixture.requester, "/k");
        let response = fixture.respond(&filter, &["zeta", "alpha"]);

        assert_eq!(Fixture::texts(&response), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_short_command_cancels_for_every_threshold() {
        for threshold in 1..=4usize {
            let fixture = Fixture::new();
            let filter = fixture.filter_with(TabCompleteConfig {
                prevent_below_length: threshold,
                ..TabCompleteConfig::default()
            });

            // "/" + (threshold - 1) typed characters: one short of the bar
            let request = format!("/{}", "k".repeat(threshold - 1));
            fixture.correlation.put(&fixture.requester, request);
            let response = fixture.respond(&filter, &["kick"]);

            assert!(response.is_cancelled(), "threshold {threshold}");
        }
    }

    #[test]
    fn test_command_at_threshold_is_not_cancelled() {
        let fixture = Fixture::new();
        let filter = fixture.filter_with(TabCompleteConfig {
            prevent_below_length: 2,
            ..TabCompleteConfig::default()
        });

        fixture.correlation.put(&fixture.requester, "/ki");
        let response = fixture.respond(&filter, &["kick"]);

        assert!(!response.is_cancelled());
    }

    #[test]
    fn test_hidden_player_is_dropped() {
        let fixture = Fixture::new();
        let ghost = fixture.directory.add_player("Ghost");
        fixture.directory.hide(&ghost);
        fixture.directory.add_player("Bob");
        let filter = fixture.filter_with(TabCompleteConfig::default());

        fixture.correlation.put(&fixture.requester, "/msg G");
        let response = fixture.respond(&filter, &["Ghost", "Bob"]);

        assert_eq!(Fixture::texts(&response), vec!["Bob"]);
    }

    #[test]
    fn test_visibility_bypass_keeps_hidden_players() {
        let fixture = Fixture::new();
        let ghost = fixture.directory.add_player("Ghost");
        fixture.directory.hide(&ghost);
        fixture
            .permissions
            .grant(&fixture.requester, Capability::VisibilityBypass);
        let filter = fixture.filter_with(TabCompleteConfig::default());

        fixture.correlation.put(&fixture.requester, "/msg G");
        let response = fixture.respond(&filter, &["Ghost"]);

        assert_eq!(Fixture::texts(&response), vec!["Ghost"]);
    }

    #[test]
    fn test_nickname_substitution() {
        let fixture = Fixture::new();
        let alice = fixture.directory.add_player("Alice");
        fixture.directory.set_alias(&alice, "Ali");
        let filter = fixture.filter_with(TabCompleteConfig {
            use_nicknames: true,
            ..TabCompleteConfig::default()
        });

        fixture.correlation.put(&fixture.requester, "/msg A");
        let response = fixture.respond(&filter, &["alice"]);

        assert_eq!(Fixture::texts(&response), vec!["Ali"]);
    }

    #[test]
    fn test_canonical_name_without_nicknames() {
        let fixture = Fixture::new();
        let alice = fixture.directory.add_player("Alice");
        fixture.directory.set_alias(&alice, "Ali");
        let filter = fixture.filter_with(TabCompleteConfig::default());

        fixture.correlation.put(&fixture.requester, "/msg a");
        let response = fixture.respond(&filter, &["alice"]);

        // resolution is case-insensitive; display is the canonical name
        assert_eq!(Fixture::texts(&response), vec!["Alice"]);
    }

    #[test]
    fn test_command_allow_list_drops_unlisted_players() {
        let fixture = Fixture::new();
        fixture.directory.add_player("Alice");
        fixture.directory.add_player("Bob");
        let filter = fixture.filter_with(TabCompleteConfig {
            allow_list: vec!["^Alice$".to_string()],
            ..TabCompleteConfig::default()
        });

        fixture.correlation.put(&fixture.requester, "/msg ");
        let response = fixture.respond(&filter, &["Alice", "Bob"]);

        assert_eq!(Fixture::texts(&response), vec!["Alice"]);
    }

    #[test]
    fn test_allow_list_ignored_for_chat_form() {
        let fixture = Fixture::new();
        fixture.directory.add_player("Bob");
        let filter = fixture.filter_with(TabCompleteConfig {
            allow_list: vec!["^nothing$".to_string()],
            ..TabCompleteConfig::default()
        });

        fixture.correlation.put(&fixture.requester, "hello b");
        let response = fixture.respond(&filter, &["Bob"]);

        assert_eq!(Fixture::texts(&response), vec!["Bob", "Bob"]);
    }

    #[test]
    fn test_unresolvable_candidates_pass_through() {
        let fixture = Fixture::new();
        let filter = fixture.filter_with(TabCompleteConfig {
            allow_list: vec!["^nothing$".to_string()],
            ..TabCompleteConfig::default()
        });

        fixture.correlation.put(&fixture.requester, "/gamemode ");
        let response = fixture.respond(&filter, &["survival", "creative"]);

        assert_eq!(Fixture::texts(&response), vec!["creative", "survival"]);
    }

    #[test]
    fn test_chat_form_completes_last_word() {
        let fixture = Fixture::new();
        fixture.directory.add_player("Alice");
        fixture.directory.add_player("Albert");
        fixture.directory.add_player("Bob");
        let filter = fixture.filter_with(TabCompleteConfig::default());

        fixture.correlation.put(&fixture.requester, "good morning al");
        let response = fixture.respond(&filter, &[]);

        assert_eq!(Fixture::texts(&response), vec!["Albert", "Alice"]);
    }

    #[test]
    fn test_chat_form_trailing_space_matches_everyone_visible() {
        let fixture = Fixture::new();
        fixture.directory.add_player("Alice");
        let ghost = fixture.directory.add_player("Ghost");
        fixture.directory.hide(&ghost);
        let filter = fixture.filter_with(TabCompleteConfig::default());

        fixture.correlation.put(&fixture.requester, "hello ");
        let response = fixture.respond(&filter, &[]);

        assert_eq!(Fixture::texts(&response), vec!["Alice"]);
    }

    #[test]
    fn test_sort_is_case_insensitive_and_stable() {
        let fixture = Fixture::new();
        let filter = fixture.filter_with(TabCompleteConfig::default());

        fixture.correlation.put(&fixture.requester, "x");
        let response = fixture.respond(&filter, &["bob", "Alice", "alice"]);

        // "Alice" and "alice" fold equal; original relative order survives
        assert_eq!(Fixture::texts(&response), vec!["Alice", "alice", "bob"]);
    }

    #[test]
    fn test_correlation_is_consumed_by_the_response() {
        let fixture = Fixture::new();
        let filter = fixture.filter_with(TabCompleteConfig {
            prevent_below_length: 5,
            ..TabCompleteConfig::default()
        });

        fixture.correlation.put(&fixture.requester, "/k");
        let first = fixture.respond(&filter, &["kick"]);
        assert!(first.is_cancelled());

        // Second response for the same client has nothing to correlate.
        let second = fixture.respond(&filter, &["kick"]);
        assert!(!second.is_cancelled());
        assert_eq!(Fixture::texts(&second), vec!["kick"]);
    }

    #[test]
    fn test_last_token() {
        assert_eq!(last_token("hello al"), "al");
        assert_eq!(last_token("hello "), "");
        assert_eq!(last_token("single"), "single");
        assert_eq!(last_token(""), "");
    }
}
