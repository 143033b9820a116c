// src/history/message.rs

use std::sync::OnceLock;

use regex::Regex;

/// Fields parsed out of a terminal history record's message.
///
/// The engine encodes the outcome of a finished execution as
/// `<OUTCOME>/<kind>:<trigger> <free text>`, e.g.
/// `OK/task:NightlyBackup finished cleanly`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedOutcome {
    pub outcome: String,
    pub trigger: String,
    pub rest: String,
}

fn outcome_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<outcome>[^/\s]+)/(?P<kind>[^:\s]+):(?P<trigger>\S+)(?:\s+(?P<rest>.*))?$")
            .expect("outcome pattern is a valid regex")
    })
}

/// Parse a terminal message, or `None` when it does not match the pattern.
///
/// The `<kind>` segment (`task`, `condition`, ...) is matched but not kept:
/// history entries only carry the trigger name.
pub(crate) fn parse_outcome(message: &str) -> Option<ParsedOutcome> {
    let captures = outcome_pattern().captures(message.trim())?;
    Some(ParsedOutcome {
        outcome: captures["outcome"].to_string(),
        trigger: captures["trigger"].to_string(),
        rest: captures
            .name("rest")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    })
}
