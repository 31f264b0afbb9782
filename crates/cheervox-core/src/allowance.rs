//! Per-donation character budget.
//!
//! Character limits are imposed per donation, which may contain multiple
//! prompts: the first prompt consumes from the budget before later prompts
//! see the remainder. Privileged senders bypass the quota entirely.

use crate::config::CheerConfig;

/// Truncate `text` to the characters still allowed for this task.
///
/// The cap is `base_cap + (bits - threshold) * extra_chars_per_bit`, less
/// the allowed lengths of the prompts already processed for the same task
/// (`prior_chars`). A zero or negative remainder yields an empty string,
/// which callers treat as "drop this prompt".
pub fn allow(text: &str, bits: i64, prior_chars: usize, bypass: bool, config: &CheerConfig) -> String {
    if bypass {
        return text.to_string();
    }
    let cap = config.base_char_cap + (bits - config.bit_threshold) * config.extra_chars_per_bit
        - prior_chars as i64;
    text.chars().take(cap.max(0) as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CheerConfig {
        CheerConfig {
            bit_threshold: 100,
            base_char_cap: 200,
            extra_chars_per_bit: 2,
            ..CheerConfig::default()
        }
    }

    #[test]
    fn bypass_is_absolute() {
        let config = config();
        let text = "x".repeat(10_000);
        assert_eq!(allow(&text, 0, 9_999, true, &config), text);
    }

    #[test]
    fn cap_grows_with_bits_above_threshold() {
        // 200 + (150 - 100) * 2 = 300
        let config = config();
        let text = "x".repeat(400);
        assert_eq!(allow(&text, 150, 0, false, &config).len(), 300);
    }

    #[test]
    fn prior_consumption_shrinks_the_budget() {
        let config = config();
        let text = "x".repeat(400);
        let full = allow(&text, 150, 0, false, &config).len();
        let less = allow(&text, 150, 120, false, &config).len();
        assert_eq!(less, full - 120);
    }

    #[test]
    fn monotonically_non_increasing_in_prior_chars() {
        let config = config();
        let text = "hello world, this is a fairly long message for testing";
        let mut last = usize::MAX;
        for prior in (0..400).step_by(25) {
            let len = allow(text, 120, prior, false, &config).len();
            assert!(len <= last);
            last = len;
        }
    }

    #[test]
    fn exhausted_budget_yields_empty() {
        let config = config();
        assert_eq!(allow("anything", 100, 200, false, &config), "");
        // below threshold the cap can go negative; still just empty
        assert_eq!(allow("anything", 0, 0, false, &config), "");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut config = config();
        config.base_char_cap = 2;
        assert_eq!(allow("héllo", 100, 0, false, &config), "hé");
    }
}
