//! Authentication and onboarding endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crewdeck_types::{Invitation, TokenPair, User, UserPayload};

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::encode_query;
use crate::error::ApiError;
use crate::routes;

/// Payload returned by the auth endpoints that establish a session
/// (login, refresh, email verification, invitation acceptance). Depending on
/// the backend path it carries a nested token pair, flat token fields,
/// and/or a user object.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub tokens: Option<TokenPair>,
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserPayload>,
}

impl AuthPayload {
    /// Normalize nested or flat token fields into a pair.
    pub fn token_pair(&self) -> Option<TokenPair> {
        if let Some(pair) = &self.tokens {
            return Some(pair.clone());
        }
        match (&self.access_token, &self.refresh_token) {
            (Some(access), Some(refresh)) => Some(TokenPair::new(access, refresh)),
            _ => None,
        }
    }

    /// The normalized user, when the backend included one.
    pub fn into_user(self) -> Option<User> {
        self.user.map(UserPayload::into_user)
    }
}

/// Sign-up request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

/// Company-info onboarding step.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyInfoRequest {
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

/// Subscription onboarding step.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionRequest {
    pub plan: String,
    #[serde(rename = "paymentMethodId", skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
}

/// Invitation acceptance request body.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptInvitationRequest {
    pub token: String,
    pub name: String,
    pub password: String,
}

impl ApiClient {
    /// `POST /api/auth/register` — create an account. Public.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthPayload, ApiError> {
        let body = serde_json::to_value(req).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request_data(
            Method::POST,
            routes::AUTH_REGISTER,
            Some(&body),
            RequestOptions::public(),
        )
        .await
    }

    /// `POST /api/auth/login` — authenticate with email + password.
    ///
    /// Goes through the public path: the response (including a 401 on bad
    /// credentials) is returned as-is and never triggers a token refresh.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let body = json!({ "email": email, "password": password });
        self.request_data(
            Method::POST,
            routes::AUTH_LOGIN,
            Some(&body),
            RequestOptions::public(),
        )
        .await
    }

    /// `POST /api/auth/logout` — end the session. Authenticates via the
    /// cookie jar; network errors propagate to the caller.
    pub async fn logout(&self) -> Result<Option<String>, ApiError> {
        self.request_ack(
            Method::POST,
            routes::AUTH_LOGOUT,
            None,
            RequestOptions::public(),
        )
        .await
    }

    /// `GET /api/auth/verify-email?token=…` — link-click verification.
    /// Returns tokens so the session can be established immediately.
    pub async fn verify_email(&self, token: &str) -> Result<AuthPayload, ApiError> {
        let path = format!(
            "{}?token={}",
            routes::AUTH_VERIFY_EMAIL,
            encode_query(token)
        );
        self.request_data(Method::GET, &path, None, RequestOptions::public())
            .await
    }

    /// `POST /api/auth/verify-email` — code-entry verification.
    pub async fn verify_email_code(&self, token: &str) -> Result<AuthPayload, ApiError> {
        let body = json!({ "token": token });
        self.request_data(
            Method::POST,
            routes::AUTH_VERIFY_EMAIL,
            Some(&body),
            RequestOptions::public(),
        )
        .await
    }

    /// `POST /api/auth/resend-verification`.
    pub async fn resend_verification(&self, email: &str) -> Result<Option<String>, ApiError> {
        let body = json!({ "email": email });
        self.request_ack(
            Method::POST,
            routes::AUTH_RESEND_VERIFICATION,
            Some(&body),
            RequestOptions::public(),
        )
        .await
    }

    /// `POST /api/auth/forgot-password`.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, ApiError> {
        let body = json!({ "email": email });
        self.request_ack(
            Method::POST,
            routes::AUTH_FORGOT_PASSWORD,
            Some(&body),
            RequestOptions::public(),
        )
        .await
    }

    /// `POST /api/auth/reset-password`.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Option<String>, ApiError> {
        let body = json!({ "token": token, "password": new_password });
        self.request_ack(
            Method::POST,
            routes::AUTH_RESET_PASSWORD,
            Some(&body),
            RequestOptions::public(),
        )
        .await
    }

    /// `POST /api/auth/company-info` — returns the updated user.
    pub async fn submit_company_info(&self, req: &CompanyInfoRequest) -> Result<User, ApiError> {
        let body = serde_json::to_value(req).map_err(|e| ApiError::Decode(e.to_string()))?;
        let payload: UserPayload = self
            .request_data(
                Method::POST,
                routes::AUTH_COMPANY_INFO,
                Some(&body),
                RequestOptions::authed(),
            )
            .await?;
        Ok(payload.into_user())
    }

    /// `POST /api/auth/subscription` — returns the updated user.
    pub async fn submit_subscription(&self, req: &SubscriptionRequest) -> Result<User, ApiError> {
        let body = serde_json::to_value(req).map_err(|e| ApiError::Decode(e.to_string()))?;
        let payload: UserPayload = self
            .request_data(
                Method::POST,
                routes::AUTH_SUBSCRIPTION,
                Some(&body),
                RequestOptions::authed(),
            )
            .await?;
        Ok(payload.into_user())
    }

    /// `GET /api/auth/verify-invitation?token=…` — preview an invitation.
    pub async fn verify_invitation(&self, token: &str) -> Result<Invitation, ApiError> {
        let path = format!(
            "{}?token={}",
            routes::AUTH_VERIFY_INVITATION,
            encode_query(token)
        );
        self.request_data(Method::GET, &path, None, RequestOptions::public())
            .await
    }

    /// `POST /api/auth/accept-invitation` — join via invitation; returns
    /// tokens directly so onboarding is skipped.
    pub async fn accept_invitation(
        &self,
        req: &AcceptInvitationRequest,
    ) -> Result<AuthPayload, ApiError> {
        let body = serde_json::to_value(req).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request_data(
            Method::POST,
            routes::AUTH_ACCEPT_INVITATION,
            Some(&body),
            RequestOptions::public(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_payload_prefers_nested_tokens() {
        let data: AuthPayload = serde_json::from_str(
            r#"{"tokens":{"accessToken":"a1","refreshToken":"r1"},"accessToken":"a2"}"#,
        )
        .unwrap();
        assert_eq!(data.token_pair(), Some(TokenPair::new("a1", "r1")));
    }

    #[test]
    fn auth_payload_accepts_flat_tokens() {
        let data: AuthPayload =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert_eq!(data.token_pair(), Some(TokenPair::new("a", "r")));
    }

    #[test]
    fn auth_payload_without_tokens_yields_none() {
        let data: AuthPayload = serde_json::from_str(r#"{"accessToken":"a"}"#).unwrap();
        assert_eq!(data.token_pair(), None);
    }

    #[test]
    fn auth_payload_normalizes_nested_user() {
        let data: AuthPayload =
            serde_json::from_str(r#"{"user":{"user":{"id":"u1","email":"a@b.c"}}}"#).unwrap();
        assert_eq!(data.into_user().map(|u| u.id), Some("u1".to_string()));
    }

    #[test]
    fn company_info_serializes_camel_case() {
        let req = CompanyInfoRequest {
            company_name: "Acme Plumbing".into(),
            address: None,
            phone: None,
            industry: Some("plumbing".into()),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["companyName"], "Acme Plumbing");
        assert!(value.get("address").is_none());
    }
}
