//! Authorization Guard: gate user actions on the current session's role and
//! keep the pending login/upgrade prompt.

use std::sync::{Arc, Mutex, PoisonError};

use resourcehub_auth::{
    AuthorizationExplanation, AuthorizationRequest, Decision, DenialKind, Role, evaluate, explain,
};
use resourcehub_core::{ClientError, ClientResult};

use crate::session::SessionContext;

#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    session: SessionContext,
    prompt: Arc<Mutex<Option<AuthorizationRequest>>>,
}

impl AuthorizationGuard {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Decide against the session as it is right now. No side effects.
    ///
    /// A session still hydrating counts as signed out.
    pub fn evaluate(&self, required: Role, action_name: &str) -> Decision {
        let user = self.session.user();
        evaluate(user.as_ref(), required, action_name)
    }

    pub fn explain(&self, required: Role, action_name: &str) -> AuthorizationExplanation {
        let user = self.session.user();
        explain(user.as_ref(), required, action_name)
    }

    /// `true` when the action may proceed. On denial the prompt is replaced
    /// with a fresh request describing what is missing.
    pub fn check_authorization(&self, required: Role, action_name: &str) -> bool {
        match self.evaluate(required, action_name) {
            Decision::Granted => true,
            Decision::Denied(request) => {
                tracing::debug!(
                    required = required.as_str(),
                    action = action_name,
                    kind = ?request.kind,
                    "action denied"
                );
                *self.lock() = Some(request);
                false
            }
        }
    }

    /// Like [`check_authorization`](Self::check_authorization), but as a
    /// `Result` for callers without a prompt surface. Login-required maps to
    /// 401, anything else to 403.
    pub fn require(&self, required: Role, action_name: &str) -> ClientResult<()> {
        if self.check_authorization(required, action_name) {
            return Ok(());
        }
        let explanation = self.explain(required, action_name);
        let status = match explanation.denial {
            Some(DenialKind::LoginRequired) => 401,
            _ => 403,
        };
        Err(ClientError::auth(status, explanation.reason))
    }

    /// The pending prompt, if a check was denied and it has not been closed.
    pub fn prompt(&self) -> Option<AuthorizationRequest> {
        self.lock().clone()
    }

    pub fn close_prompt(&self) -> Option<AuthorizationRequest> {
        self.lock().take()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<AuthorizationRequest>> {
        self.prompt.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
