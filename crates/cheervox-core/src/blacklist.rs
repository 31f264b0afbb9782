//! Blocked-sender list, one name per line.

use std::collections::HashSet;
use std::path::Path;

/// Load the blacklist file into a lowercased set. A missing or unreadable
/// file means nobody is blocked. Re-read per task so edits apply without a
/// restart.
pub fn load(path: &Path) -> HashSet<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return HashSet::new();
    };
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}
