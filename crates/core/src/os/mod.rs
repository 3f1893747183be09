pub mod lifecycle;

use once_cell::sync::Lazy;
use regex::Regex;

pub use lifecycle::{LifecycleEntry, LIFECYCLE_TABLE, NORMALIZATION_RULES};

/// Returned by [`normalize`] when nothing matches.
pub const UNKNOWN_OS: &str = "unknown";

static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    NORMALIZATION_RULES
        .iter()
        .map(|(pattern, key)| (Regex::new(pattern).expect("valid regex"), *key))
        .collect()
});

pub fn lookup(key: &str) -> Option<&'static LifecycleEntry> {
    LIFECYCLE_TABLE
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, entry)| entry)
}

/// Maps free-text OS descriptions onto a canonical lifecycle key.
///
/// An exact (case-insensitive, trimmed) table key wins; otherwise the first
/// matching rule in [`NORMALIZATION_RULES`] decides. Never fails: anything
/// else, including empty input, is [`UNKNOWN_OS`].
pub fn normalize(raw: &str) -> &'static str {
    let lowered = raw.trim().to_lowercase();
    if let Some((key, _)) = LIFECYCLE_TABLE.iter().find(|(k, _)| *k == lowered) {
        return *key;
    }

    RULES
        .iter()
        .find(|(re, _)| re.is_match(raw))
        .map(|(_, key)| *key)
        .unwrap_or(UNKNOWN_OS)
}
