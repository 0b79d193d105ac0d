//! Session Context: the process-wide answer to "who is signed in".
//!
//! The state lives in a [`SessionCell`] shared by every component that needs
//! it (the transport invalidates it on a rejected token, the guard reads it).

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use resourcehub_core::{ClientResult, UserProfile};

use crate::gateway::AuthGateway;
use crate::token_store::TokenStore;

/// Lifecycle: `Hydrating` → (`Anonymous` ⇄ `Authenticated`).
///
/// `Hydrating` is left exactly once and never re-entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Hydrating,
    Anonymous,
    Authenticated { user: UserProfile, token: String },
}

impl SessionState {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Hydrating)
    }

    fn name(&self) -> &'static str {
        match self {
            SessionState::Hydrating => "hydrating",
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated { .. } => "authenticated",
        }
    }
}

/// Shared, injectable holder of the current [`SessionState`].
#[derive(Debug, Clone, Default)]
pub struct SessionCell(Arc<RwLock<SessionState>>);

impl SessionCell {
    pub fn get(&self) -> SessionState {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(guard: &mut SessionState, next: SessionState) {
        tracing::debug!(from = guard.name(), to = next.name(), "session transition");
        *guard = next;
    }

    /// Persist `user` and `token` and publish the authenticated state. The
    /// store write and the state change happen under the session lock.
    pub(crate) fn sign_in(&self, tokens: &dyn TokenStore, user: UserProfile, token: String) {
        let mut guard = self.write();
        tokens.set(&token);
        tokens.set_cached_profile(&user);
        Self::transition(&mut guard, SessionState::Authenticated { user, token });
    }

    /// Clear the store and go anonymous.
    pub(crate) fn sign_out(&self, tokens: &dyn TokenStore) {
        let mut guard = self.write();
        tokens.clear_all();
        Self::transition(&mut guard, SessionState::Anonymous);
    }

    /// Leave `Hydrating` with the state produced by `resolve`. Returns `false`
    /// (and does not call `resolve`) if hydration already happened.
    fn finish_hydration(&self, resolve: impl FnOnce() -> SessionState) -> bool {
        let mut guard = self.write();
        if !guard.is_loading() {
            return false;
        }
        let next = resolve();
        tracing::debug!(to = next.name(), "session hydrated");
        *guard = next;
        true
    }

    /// Drop the session after the backend rejected `rejected`, but only if it
    /// is still the stored token. Returns `true` when something was cleared.
    ///
    /// A session still hydrating stays `Hydrating`; hydration then finds the
    /// store empty.
    pub(crate) fn invalidate_if_current(&self, tokens: &dyn TokenStore, rejected: &str) -> bool {
        let mut guard = self.write();
        if tokens.get().as_deref() != Some(rejected) {
            return false;
        }
        tokens.clear_all();
        if guard.is_authenticated() {
            Self::transition(&mut guard, SessionState::Anonymous);
        }
        true
    }
}

/// Read-only view handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            user: state.user().cloned(),
            is_authenticated: state.is_authenticated(),
            loading: state.is_loading(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    cell: SessionCell,
    gateway: AuthGateway,
    tokens: Arc<dyn TokenStore>,
}

impl SessionContext {
    /// Starts in `Hydrating`; call [`hydrate`](Self::hydrate) once at startup.
    pub fn new(gateway: AuthGateway) -> Self {
        let cell = gateway.api().session_cell().clone();
        let tokens = Arc::clone(gateway.api().tokens());
        Self {
            cell,
            gateway,
            tokens,
        }
    }

    /// Restore the session from the token store. No network call is made, so
    /// an expired token still reads as authenticated until the backend says
    /// otherwise.
    ///
    /// A store holding only half a session (token without profile, or the
    /// reverse) is cleared and the session becomes anonymous.
    pub fn hydrate(&self) -> SessionSnapshot {
        let hydrated = self.cell.finish_hydration(|| {
            match (self.tokens.get(), self.tokens.cached_profile()) {
                (Some(token), Some(user)) => SessionState::Authenticated { user, token },
                (None, None) => SessionState::Anonymous,
                (token, user) => {
                    tracing::warn!(
                        has_token = token.is_some(),
                        has_profile = user.is_some(),
                        "discarding incomplete stored session"
                    );
                    self.tokens.clear_all();
                    SessionState::Anonymous
                }
            }
        });

        if !hydrated {
            tracing::debug!("session already hydrated");
        }
        self.snapshot()
    }

    /// Sign in. On failure the session is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserProfile> {
        Ok(self.gateway.login(email, password).await?.user)
    }

    /// Register and sign in. On failure the session is left as it was.
    pub async fn signup(&self, email: &str, password: &str) -> ClientResult<UserProfile> {
        Ok(self.gateway.register(email, password).await?.user)
    }

    /// Always ends anonymous, whatever the backend says.
    pub async fn logout(&self) {
        self.gateway.logout().await;
    }

    pub fn state(&self) -> SessionState {
        self.cell.get()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&self.cell.get())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.cell.get().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.cell.get().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.cell.get().is_loading()
    }

    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }
}
