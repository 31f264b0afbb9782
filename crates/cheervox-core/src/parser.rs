//! Cheer message parsing: free text → ordered voice prompts.
//!
//! Viewers address voices inline: `"11io dwight: hello morgan_freeman: bye"`.
//! A token is a voice indicator only when it ends with `:` and its lowercased
//! body is a known alias; everything else is accumulated as text for the
//! currently active voice. Text before the first indicator has no voice to
//! speak it and is discarded.

use crate::types::Prompt;
use crate::voices;

/// Parse a cheer message into an ordered list of prompts.
///
/// Platform-injected bit markers (`cheer100`, `Cheer2500`, ...) and the
/// configured indicator token are stripped before scanning; they are not
/// viewer content. Consecutive voice indicators with no text between them
/// produce no prompt for the earlier indicator, but the buffer and active
/// voice still reset.
pub fn parse(text: &str, indicator: &str) -> Vec<Prompt> {
    let tokens: Vec<&str> = text
        .split_whitespace()
        .filter(|t| !is_bit_marker(t) && !t.eq_ignore_ascii_case(indicator))
        .collect();

    let mut prompts = Vec::new();
    let mut voice: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for token in tokens {
        if let Some(alias) = voice_indicator(token) {
            if let Some(current) = voice.take() {
                if !buffer.is_empty() {
                    prompts.push(Prompt::new(current, buffer.join(" ")));
                }
            }
            voice = Some(alias);
            buffer.clear();
        } else if voice.is_some() {
            buffer.push(token);
        }
        // no active voice: token is discarded
    }

    if let Some(current) = voice {
        if !buffer.is_empty() {
            prompts.push(Prompt::new(current, buffer.join(" ")));
        }
    }

    prompts
}

/// Bit markers look like `cheerNNN`: "cheer" prefix (any case) followed by
/// one or more digits.
fn is_bit_marker(token: &str) -> bool {
    token.len() > 5
        && token[..5].eq_ignore_ascii_case("cheer")
        && token[5..].chars().all(|c| c.is_ascii_digit())
}

/// If the token is `alias:` for a known alias, return the lowercased alias.
fn voice_indicator(token: &str) -> Option<String> {
    let body = token.strip_suffix(':')?;
    let alias = body.to_lowercase();
    voices::is_known(&alias).then_some(alias)
}
