//! HTTP plumbing shared by every service: URL building, bearer attachment,
//! envelope decoding and error classification.

use std::sync::Arc;

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use resourcehub_core::{ClientError, ClientResult, Envelope};

use crate::config::ClientConfig;
use crate::session::SessionCell;
use crate::token_store::TokenStore;

/// How a failed response is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorScope {
    /// Credential endpoints: every rejection is an `Auth` error.
    Auth,
    /// Data endpoints: 401/403 → `Auth`, 404 → `NotFound`, otherwise `Fetch`.
    Resource,
}

/// Thin client around `reqwest` bound to one backend and one token store.
///
/// Cheap to clone; clones share the connection pool, the token store and the
/// session cell.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    session: SessionCell,
}

/// A request being assembled. Built by [`ApiClient::request`].
pub(crate) struct ApiRequest {
    builder: reqwest::RequestBuilder,
    method: Method,
    path: String,
    bearer: Option<String>,
    request_id: Uuid,
    scope: ErrorScope,
    context: String,
}

impl ApiRequest {
    pub(crate) fn query(mut self, pairs: &[(&'static str, String)]) -> Self {
        self.builder = self.builder.query(pairs);
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.builder = self.builder.json(body);
        self
    }

    pub(crate) fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.builder = self.builder.multipart(form);
        self
    }

    pub(crate) fn scope(mut self, scope: ErrorScope) -> Self {
        self.scope = scope;
        self
    }
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        tokens: Arc<dyn TokenStore>,
        session: SessionCell,
    ) -> ClientResult<Self> {
        let base_url = Url::parse(&config.api_url).map_err(|e| {
            ClientError::invalid_field("api_url", format!("invalid API URL '{}': {e}", config.api_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::invalid_field(
                "api_url",
                format!("API URL '{}' cannot carry a path", config.api_url),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            tokens,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub(crate) fn session_cell(&self) -> &SessionCell {
        &self.session
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request that carries the bearer token when one is held.
    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
        context: impl Into<String>,
    ) -> ApiRequest {
        self.build(method, segments, context.into(), self.tokens.get())
    }

    /// Start a request that never carries credentials (register/login).
    pub(crate) fn anonymous_request(
        &self,
        method: Method,
        segments: &[&str],
        context: impl Into<String>,
    ) -> ApiRequest {
        self.build(method, segments, context.into(), None)
    }

    fn build(
        &self,
        method: Method,
        segments: &[&str],
        context: String,
        bearer: Option<String>,
    ) -> ApiRequest {
        let url = self.url(segments);
        let path = url.path().to_string();
        let request_id = Uuid::now_v7();

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header("x-request-id", request_id.to_string());
        if let Some(token) = &bearer {
            builder = builder.bearer_auth(token);
        }

        ApiRequest {
            builder,
            method,
            path,
            bearer,
            request_id,
            scope: ErrorScope::Resource,
            context,
        }
    }

    /// Send and return the raw JSON body of a successful response.
    ///
    /// An empty success body reads as `{}`. A 401 on a request that carried
    /// the current token ends the session before the error is returned.
    pub(crate) async fn send_value(&self, request: ApiRequest) -> ClientResult<Value> {
        let ApiRequest {
            builder,
            method,
            path,
            bearer,
            request_id,
            scope,
            context,
        } = request;

        tracing::debug!(%request_id, %method, %path, authenticated = bearer.is_some(), "sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%request_id, %method, %path, "request failed: {e}");
            transport_error(&e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(%request_id, %method, %path, "reading response failed: {e}");
            transport_error(&e)
        })?;
        let body: Option<Value> = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        tracing::debug!(%request_id, status = status.as_u16(), "response received");

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(backend_message)
                .unwrap_or_else(|| format!("{context} (HTTP {})", status.as_u16()));

            if status == StatusCode::UNAUTHORIZED {
                if let Some(rejected) = &bearer {
                    self.invalidate_session(rejected, request_id);
                }
            }

            return Err(classify(scope, status, message));
        }

        let body = match body {
            Some(body) => body,
            None if bytes.is_empty() || bytes.iter().all(u8::is_ascii_whitespace) => {
                Value::Object(serde_json::Map::new())
            }
            None => {
                return Err(ClientError::unknown(format!(
                    "{context}: response body was not JSON"
                )));
            }
        };

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = backend_message(&body).unwrap_or(context);
            return Err(match scope {
                ErrorScope::Auth => ClientError::auth(status.as_u16(), message),
                ErrorScope::Resource => ClientError::fetch(Some(status.as_u16()), message),
            });
        }

        Ok(body)
    }

    /// Send and decode the standard envelope with a typed payload.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> ClientResult<Envelope<T>> {
        let context = request.context.clone();
        let body = self.send_value(request).await?;
        serde_json::from_value(body).map_err(|e| {
            ClientError::unknown(format!("{context}: unexpected response shape: {e}"))
        })
    }

    /// Treat a rejected bearer token as an implicit logout.
    ///
    /// Only the token that was actually rejected is cleared; a newer session
    /// established while the request was in flight is left alone.
    fn invalidate_session(&self, rejected: &str, request_id: Uuid) {
        if self.session.invalidate_if_current(self.tokens.as_ref(), rejected) {
            tracing::warn!(%request_id, "bearer token rejected; ended session");
        }
    }
}

/// `message`, then `error`, from a backend JSON body.
fn backend_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .into_iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

fn transport_error(err: &reqwest::Error) -> ClientError {
    if err.is_builder() {
        ClientError::unknown(format!("invalid request: {err}"))
    } else if err.is_decode() {
        ClientError::unknown(format!("could not decode response: {err}"))
    } else {
        ClientError::network(err.to_string())
    }
}

fn classify(scope: ErrorScope, status: StatusCode, message: String) -> ClientError {
    let code = status.as_u16();
    match scope {
        ErrorScope::Auth => ClientError::auth(code, message),
        ErrorScope::Resource => match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::auth(code, message),
            StatusCode::NOT_FOUND => ClientError::not_found(message),
            _ => ClientError::fetch(Some(code), message),
        },
    }
}
