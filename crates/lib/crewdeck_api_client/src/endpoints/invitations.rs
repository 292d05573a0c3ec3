//! Invitation management endpoints.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crewdeck_types::Invitation;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::routes;

/// Create body for an invitation.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationInput {
    pub email: String,
    /// Role name the invitee will receive.
    pub role: String,
}

impl ApiClient {
    /// `GET /api/invitations`.
    pub async fn list_invitations(&self) -> Result<Vec<Invitation>, ApiError> {
        self.request_data(
            Method::GET,
            routes::INVITATIONS,
            None,
            RequestOptions::authed(),
        )
        .await
    }

    /// `POST /api/invitations`.
    pub async fn create_invitation(&self, input: &InvitationInput) -> Result<Invitation, ApiError> {
        let body = json!({ "email": input.email, "role": input.role });
        self.request_data(
            Method::POST,
            routes::INVITATIONS,
            Some(&body),
            RequestOptions::authed(),
        )
        .await
    }

    /// `POST /api/invitations/:id/resend` — returns the refreshed invitation.
    pub async fn resend_invitation(&self, id: &str) -> Result<Invitation, ApiError> {
        self.request_data(
            Method::POST,
            &routes::invitation_resend(id),
            None,
            RequestOptions::authed(),
        )
        .await
    }

    /// `DELETE /api/invitations/:id` — cancel a pending invitation.
    pub async fn cancel_invitation(&self, id: &str) -> Result<Option<String>, ApiError> {
        self.request_ack(
            Method::DELETE,
            &routes::invitation(id),
            None,
            RequestOptions::authed(),
        )
        .await
    }
}
