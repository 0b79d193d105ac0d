use serde::Serialize;

use resourcehub_core::UserProfile;

use crate::roles::{Role, UnknownRole};

/// Why a gated action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// Nobody is signed in.
    LoginRequired,
    /// Signed in, but the role's level is below the requirement.
    InsufficientRole,
    /// Signed in with a role id missing from the role table.
    UnrecognizedRole,
}

/// A refused gated action, surfaced to the UI as a login/upgrade prompt.
///
/// Lives until the prompt is dismissed or the next check replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    pub required_role: Role,
    pub action_name: String,
    pub kind: DenialKind,
}

impl AuthorizationRequest {
    /// `true` when the prompt asks the user to sign in rather than upgrade.
    pub fn is_login_prompt(&self) -> bool {
        self.kind == DenialKind::LoginRequired
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Granted,
    Denied(AuthorizationRequest),
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted)
    }

    pub fn denial(&self) -> Option<&AuthorizationRequest> {
        match self {
            Decision::Granted => None,
            Decision::Denied(request) => Some(request),
        }
    }
}

/// Role the profile acts with: its declared role, or visitor when none is set.
pub fn effective_role(user: &UserProfile) -> Result<Role, UnknownRole> {
    match user.role.as_deref() {
        None => Ok(Role::Visitor),
        Some(raw) if raw.trim().is_empty() => Ok(Role::Visitor),
        Some(raw) => raw.parse(),
    }
}

/// Decide whether `user` may perform an action requiring `required`.
///
/// - No IO
/// - No caching (role or session may change between calls)
pub fn evaluate(user: Option<&UserProfile>, required: Role, action_name: &str) -> Decision {
    let deny = |kind| {
        Decision::Denied(AuthorizationRequest {
            required_role: required,
            action_name: action_name.to_string(),
            kind,
        })
    };

    let Some(user) = user else {
        return deny(DenialKind::LoginRequired);
    };

    match effective_role(user) {
        Ok(role) if role.can_act_as(required) => Decision::Granted,
        Ok(_) => deny(DenialKind::InsufficientRole),
        Err(_) => deny(DenialKind::UnrecognizedRole),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Human-readable account of an authorization decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationExplanation {
    pub required_role: Role,
    pub granted: bool,
    pub reason: String,
    /// Role id as held by the profile (raw, may be unrecognised).
    pub current_role: Option<String>,
    pub denial: Option<DenialKind>,
}

/// Explain the decision [`evaluate`] would make.
pub fn explain(user: Option<&UserProfile>, required: Role, action_name: &str) -> AuthorizationExplanation {
    let decision = evaluate(user, required, action_name);
    let current_role = user.map(|u| {
        effective_role(u)
            .map(|r| r.as_str().to_string())
            .unwrap_or_else(|e| e.0)
    });

    let reason = match decision.denial() {
        None => format!(
            "{} role satisfies the {} requirement to {}",
            current_role.as_deref().unwrap_or_default(),
            required.display_name(),
            action_name
        ),
        Some(request) => match request.kind {
            DenialKind::LoginRequired => format!("Please log in or sign up to {action_name}"),
            DenialKind::InsufficientRole => format!(
                "You need {} access or higher to {}",
                required.display_name(),
                action_name
            ),
            DenialKind::UnrecognizedRole => format!(
                "Your role '{}' is not recognised; {} access is required to {}",
                current_role.as_deref().unwrap_or_default(),
                required.display_name(),
                action_name
            ),
        },
    };

    AuthorizationExplanation {
        required_role: required,
        granted: decision.is_granted(),
        reason,
        current_role,
        denial: decision.denial().map(|r| r.kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use resourcehub_core::UserId;

    fn user_with_role(role: Option<&str>) -> UserProfile {
        UserProfile {
            id: UserId::new("u1"),
            email: "a@b.com".to_string(),
            name: None,
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn anonymous_is_asked_to_log_in() {
        let decision = evaluate(None, Role::Member, "upload a file");
        let request = decision.denial().unwrap();
        assert_eq!(request.action_name, "upload a file");
        assert_eq!(request.required_role, Role::Member);
        assert!(request.is_login_prompt());
    }

    #[test]
    fn missing_role_acts_as_visitor() {
        let user = user_with_role(None);
        assert!(evaluate(Some(&user), Role::Visitor, "view").is_granted());

        let decision = evaluate(Some(&user), Role::Member, "download");
        assert_eq!(decision.denial().unwrap().kind, DenialKind::InsufficientRole);
    }

    #[test]
    fn member_meets_member_but_not_co_manager() {
        let user = user_with_role(Some("member"));
        assert_eq!(evaluate(Some(&user), Role::Member, "upload a file"), Decision::Granted);
        assert!(!evaluate(Some(&user), Role::CoManager, "delete a file").is_granted());
    }

    #[test]
    fn unknown_role_is_never_granted() {
        let user = user_with_role(Some("moderator"));
        let decision = evaluate(Some(&user), Role::Visitor, "view");
        assert_eq!(decision.denial().unwrap().kind, DenialKind::UnrecognizedRole);
    }

    #[test]
    fn explanation_mentions_required_role() {
        let user = user_with_role(Some("visitor"));
        let explanation = explain(Some(&user), Role::CoManager, "edit a file");
        assert!(!explanation.granted);
        assert_eq!(explanation.current_role.as_deref(), Some("visitor"));
        assert_eq!(explanation.reason, "You need Co-Manager access or higher to edit a file");

        let explanation = explain(None, Role::Member, "save a folder");
        assert_eq!(explanation.denial, Some(DenialKind::LoginRequired));
        assert_eq!(explanation.current_role, None);
    }

    proptest! {
        /// Property: a signed-in user with a known role is granted exactly when
        /// their level reaches the requirement.
        #[test]
        fn decision_agrees_with_levels(
            actual in prop::sample::select(Role::ALL.to_vec()),
            required in prop::sample::select(Role::ALL.to_vec()),
            action in "[a-z ]{1,24}"
        ) {
            let user = user_with_role(Some(actual.as_str()));
            let decision = evaluate(Some(&user), required, &action);
            prop_assert_eq!(decision.is_granted(), actual.level() >= required.level());
            if let Some(request) = decision.denial() {
                prop_assert_eq!(&request.action_name, &action);
                prop_assert_eq!(request.kind, DenialKind::InsufficientRole);
            }
        }
    }
}
