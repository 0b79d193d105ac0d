//! Auth Gateway: register, login and logout against the backend.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use resourcehub_auth::validate_credentials;
use resourcehub_core::{ClientError, ClientResult, UserProfile};

use crate::token_store::TokenStore;
use crate::transport::{ApiClient, ErrorScope};

const AUTH: &str = "auth";

/// Successful register/login result. The token is already persisted and the
/// shared session is already authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct AuthGateway {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl AuthGateway {
    pub fn new(api: ApiClient) -> Self {
        let tokens = Arc::clone(api.tokens());
        Self { api, tokens }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Create an account and sign in with it.
    pub async fn register(&self, email: &str, password: &str) -> ClientResult<AuthPayload> {
        self.authenticate("register", email, password, "Registration failed")
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthPayload> {
        self.authenticate("login", email, password, "Login failed").await
    }

    async fn authenticate(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
        context: &str,
    ) -> ClientResult<AuthPayload> {
        validate_credentials(email, password)?;

        let request = self
            .api
            .anonymous_request(Method::POST, &[AUTH, endpoint], context)
            .scope(ErrorScope::Auth)
            .json(&Credentials { email, password });
        let body = self.api.send_value(request).await?;

        let payload = normalize_auth_response(&body)?;
        self.api
            .session_cell()
            .sign_in(self.tokens.as_ref(), payload.user.clone(), payload.token.clone());

        tracing::info!(user_id = %payload.user.id, endpoint, "signed in");
        Ok(payload)
    }

    /// Best-effort server logout. Local credentials are always cleared and the
    /// session ends, even when the backend is unreachable or rejects the call.
    pub async fn logout(&self) {
        let request = self
            .api
            .request(Method::POST, &[AUTH, "logout"], "Logout failed")
            .scope(ErrorScope::Auth);

        if let Err(err) = self.api.send_value(request).await {
            tracing::warn!(code = err.code(), "logout request failed, clearing local session anyway: {err}");
        }

        self.api.session_cell().sign_out(self.tokens.as_ref());
        tracing::info!("signed out");
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    /// `true` when a token is held. Says nothing about server-side validity.
    pub fn has_token(&self) -> bool {
        self.tokens.get().is_some()
    }
}

/// Pull `{user, token}` out of either `{data: {user, token}}` or a flat
/// `{user, token}` body, preferring the nested form.
pub(crate) fn normalize_auth_response(body: &Value) -> ClientResult<AuthPayload> {
    let pick = |key: &str| {
        body.get("data")
            .and_then(|data| data.get(key))
            .filter(|v| !v.is_null())
            .or_else(|| body.get(key).filter(|v| !v.is_null()))
    };

    let token = pick("token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let (Some(user), Some(token)) = (pick("user"), token) else {
        return Err(ClientError::unknown(
            "Authentication response did not include a user and token",
        ));
    };

    let user: UserProfile = serde_json::from_value(user.clone()).map_err(|e| {
        ClientError::unknown(format!("Authentication response had an unreadable user: {e}"))
    })?;

    Ok(AuthPayload {
        user,
        token: token.to_string(),
    })
}
