//! Subscription status as reported by the billing backend.

use serde::{Deserialize, Serialize};

/// Subscription state attached to a user account.
///
/// `Trial` and `Active` both count as an active subscription for gating
/// purposes; everything else (or no status at all) requires the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Cancelled,
    Expired,
    PastDue,
}

impl SubscriptionStatus {
    /// Parse a backend status string. Unknown statuses map to `None` so a new
    /// server-side status degrades to "no active subscription" instead of a
    /// deserialization failure.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "TRIAL" => Some(Self::Trial),
            "ACTIVE" => Some(Self::Active),
            "CANCELLED" => Some(Self::Cancelled),
            "EXPIRED" => Some(Self::Expired),
            "PAST_DUE" => Some(Self::PastDue),
            _ => None,
        }
    }

    /// Whether this status grants access to subscription-gated screens.
    pub fn is_entitled(&self) -> bool {
        matches!(self, Self::Trial | Self::Active)
    }
}

/// Lenient deserializer for `Option<SubscriptionStatus>` fields: absent,
/// null, and unrecognized strings all become `None`.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<SubscriptionStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SubscriptionStatus::parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_statuses() {
        assert_eq!(
            SubscriptionStatus::parse("TRIAL"),
            Some(SubscriptionStatus::Trial)
        );
        assert_eq!(
            SubscriptionStatus::parse("ACTIVE"),
            Some(SubscriptionStatus::Active)
        );
        assert_eq!(
            SubscriptionStatus::parse("PAST_DUE"),
            Some(SubscriptionStatus::PastDue)
        );
    }

    #[test]
    fn parse_unknown_status_is_none() {
        assert_eq!(SubscriptionStatus::parse("COMPED"), None);
        assert_eq!(SubscriptionStatus::parse(""), None);
    }

    #[test]
    fn only_trial_and_active_are_entitled() {
        assert!(SubscriptionStatus::Trial.is_entitled());
        assert!(SubscriptionStatus::Active.is_entitled());
        assert!(!SubscriptionStatus::Cancelled.is_entitled());
        assert!(!SubscriptionStatus::Expired.is_entitled());
        assert!(!SubscriptionStatus::PastDue.is_entitled());
    }
}
