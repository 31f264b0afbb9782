//! Event admission: which cheers enter the pipeline.
//!
//! Rules are evaluated in order; the first that matches decides. Rejections
//! are expected outcomes, not errors, and carry a reason for the log.

use crate::config::CheerConfig;
use crate::types::CheerEvent;
use std::collections::HashSet;

/// Why an event was admitted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitReason {
    Blacklisted,
    /// Free-pass sender with the indicator present; bit threshold is skipped.
    PrivilegedOverride,
    MissingIndicator,
    InsufficientBits,
    ThresholdMet,
}

impl AdmitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmitReason::Blacklisted => "blacklisted",
            AdmitReason::PrivilegedOverride => "privileged-override",
            AdmitReason::MissingIndicator => "missing-indicator",
            AdmitReason::InsufficientBits => "insufficient-bits",
            AdmitReason::ThresholdMet => "threshold-met",
        }
    }
}

/// Outcome of running an event through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmitDecision {
    pub admitted: bool,
    pub reason: AdmitReason,
}

/// Decide whether a cheer event should be read aloud.
///
/// The blacklist always wins. Free-pass senders only need the indicator in
/// the message; everyone else needs both the indicator and enough bits.
pub fn admit(event: &CheerEvent, config: &CheerConfig, blacklist: &HashSet<String>) -> AdmitDecision {
    let sender = event.sender.to_lowercase();
    let has_indicator = event.has_indicator(&config.indicator);

    if blacklist.contains(&sender) {
        return rejected(AdmitReason::Blacklisted);
    }
    if config.is_free_pass(&sender) && has_indicator {
        return admitted(AdmitReason::PrivilegedOverride);
    }
    if !has_indicator {
        return rejected(AdmitReason::MissingIndicator);
    }
    if event.bits < config.bit_threshold {
        return rejected(AdmitReason::InsufficientBits);
    }
    admitted(AdmitReason::ThresholdMet)
}

fn admitted(reason: AdmitReason) -> AdmitDecision {
    AdmitDecision { admitted: true, reason }
}

fn rejected(reason: AdmitReason) -> AdmitDecision {
    AdmitDecision { admitted: false, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(sender: &str, message: &str, bits: i64) -> CheerEvent {
        CheerEvent {
            sender: sender.into(),
            message: message.into(),
            bits,
        }
    }

    fn config() -> CheerConfig {
        CheerConfig::default()
    }

    #[test]
    fn blacklist_wins_over_everything() {
        let blacklist = HashSet::from(["troll".to_string()]);
        // even a free-pass user with indicator and bits is blocked
        let mut config = config();
        config.free_pass_users.push("troll".to_string());
        let decision = admit(&event("Troll", "11io dwight: hi", 10_000), &config, &blacklist);
        assert!(!decision.admitted);
        assert_eq!(decision.reason, AdmitReason::Blacklisted);
    }

    #[test]
    fn free_pass_skips_bit_threshold() {
        let decision = admit(&event("bemoor", "11io dwight: hi", 1), &config(), &HashSet::new());
        assert!(decision.admitted);
        assert_eq!(decision.reason, AdmitReason::PrivilegedOverride);
    }

    #[test]
    fn free_pass_still_needs_the_indicator() {
        let decision = admit(&event("bemoor", "dwight: hi", 1), &config(), &HashSet::new());
        assert!(!decision.admitted);
        assert_eq!(decision.reason, AdmitReason::MissingIndicator);
    }

    #[test]
    fn missing_indicator_rejects() {
        let decision = admit(&event("alice", "dwight: hi", 500), &config(), &HashSet::new());
        assert!(!decision.admitted);
        assert_eq!(decision.reason, AdmitReason::MissingIndicator);
    }

    #[test]
    fn insufficient_bits_rejects() {
        let decision = admit(&event("alice", "11io dwight: hi", 99), &config(), &HashSet::new());
        assert!(!decision.admitted);
        assert_eq!(decision.reason, AdmitReason::InsufficientBits);
    }

    #[test]
    fn threshold_and_indicator_admit() {
        let decision = admit(&event("alice", "11io dwight: hi", 100), &config(), &HashSet::new());
        assert!(decision.admitted);
        assert_eq!(decision.reason, AdmitReason::ThresholdMet);
    }

    #[test]
    fn sender_matching_is_case_insensitive() {
        let blacklist = HashSet::from(["loudguy".to_string()]);
        let decision = admit(&event("LoudGuy", "11io dwight: hi", 500), &config(), &blacklist);
        assert_eq!(decision.reason, AdmitReason::Blacklisted);
    }
}
