//! Static mapping of user-facing voice aliases to ElevenLabs voice ids.
//!
//! Aliases are the labels viewers type (`dwight: say something`). An alias
//! absent from this table is never treated as a voice indicator during
//! parsing, so adding a voice here is all it takes to make it addressable.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static VOICE_ALIAS_TO_VOICE_ID: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("dwight", "D38z5RcWu1voky8WS1ja"),
        ("morgan_freeman", "TxGEqnHWrfWFTfGW9XjX"),
        ("gandalf", "VR6AewLTigWG4xSOukaG"),
        ("spongebob", "yoZ06aMxZJJ28mfd3POQ"),
        ("peter_griffin", "ZQe5CZNOzWyzPSCn5a3c"),
    ])
});

/// Resolve an alias (already lowercased) to its provider voice id.
pub fn resolve(alias: &str) -> Option<&'static str> {
    VOICE_ALIAS_TO_VOICE_ID.get(alias).copied()
}

/// Whether the alias is addressable. Parsing uses this to decide if a
/// `name:` token is a voice indicator or ordinary text.
pub fn is_known(alias: &str) -> bool {
    VOICE_ALIAS_TO_VOICE_ID.contains_key(alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_aliases_resolve() {
        assert!(is_known("dwight"));
        assert!(is_known("morgan_freeman"));
        assert!(resolve("dwight").is_some());
    }

    #[test]
    fn unknown_alias_is_rejected() {
        assert!(!is_known("nobody"));
        assert!(resolve("nobody").is_none());
    }
}
