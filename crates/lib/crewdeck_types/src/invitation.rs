//! Invitation model. Lifecycle is driven entirely by the backend; the client
//! only triggers resend/cancel and reflects the returned status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
    Cancelled,
}

/// A pending or resolved invitation to join a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub email: String,
    /// Role name the invitee will receive on acceptance.
    pub role: String,
    pub status: InvitationStatus,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Whether resend/cancel actions still apply.
    pub fn is_actionable(&self) -> bool {
        self.status == InvitationStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_screaming_snake_case() {
        let s: InvitationStatus = serde_json::from_str(r#""PENDING""#).unwrap();
        assert_eq!(s, InvitationStatus::Pending);
        assert_eq!(serde_json::to_string(&s).unwrap(), r#""PENDING""#);
    }

    #[test]
    fn only_pending_invitations_are_actionable() {
        let mut inv: Invitation = serde_json::from_str(
            r#"{"id":"i1","email":"a@b.c","role":"member","status":"PENDING",
                "created_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(inv.is_actionable());
        inv.status = InvitationStatus::Cancelled;
        assert!(!inv.is_actionable());
    }
}
