//! # Wire-Facing Constants
//!
//! Behavior the other side of the wire already depends on.
//!
//! **CRITICAL:** clients render scroll-back against these values and
//! producers embed markers against them. Changes here are protocol changes,
//! not tuning.

use std::time::Duration;

/// Number of delivered chat payloads retained per client.
///
/// This is the depth of the client's rendering buffer: a retraction replay
/// sends exactly this many payloads so the visible scroll-back is fully
/// replaced.
pub const HISTORY_WINDOW: usize = 100;

/// How long an unanswered tab-complete request stays correlatable.
///
/// A response arriving after this window is passed through unfiltered.
pub const CORRELATION_TTL: Duration = Duration::from_secs(10 * 60);

/// First character of a command-form request.
pub const COMMAND_PREFIX: char = '/';

/// Protocol version that introduced server-declared completions ("the
/// flattening", game version 1.13).
///
/// From this version on the client no longer sends free-form tab-complete
/// text, so the request/response correlation below has nothing to correlate
/// and the whole tab-complete subsystem stays unregistered.
pub const FLATTENING_PROTOCOL: u32 = 393;
