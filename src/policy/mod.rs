use crate::auth::Role;
use crate::session::Session;

/// The four gated features of the records view. They currently share a
/// single role policy, but call sites name the feature they gate so the
/// policies can diverge later without touching callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    NewProject,
    UploadData,
    DownloadReport,
    ScheduleAudit,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::NewProject,
        Capability::UploadData,
        Capability::DownloadReport,
        Capability::ScheduleAudit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Capability::NewProject => "new-project",
            Capability::UploadData => "upload-data",
            Capability::DownloadReport => "download-report",
            Capability::ScheduleAudit => "schedule-audit",
        }
    }
}

pub fn is_authenticated(session: Option<&Session>) -> bool {
    session.map(|s| !s.email.trim().is_empty()).unwrap_or(false)
}

pub fn can_see_all_states(session: Option<&Session>) -> bool {
    matches!(
        session.map(|s| s.role),
        Some(Role::CentralGovernment) | Some(Role::User)
    )
}

/// Central government and public viewers see every state. State government
/// viewers see exactly their bound state, compared case-insensitively.
/// Everything else, including no session at all, is denied.
pub fn can_see_state(session: Option<&Session>, state: &str) -> bool {
    let Some(session) = session else {
        return false;
    };
    match session.role {
        Role::CentralGovernment | Role::User => true,
        Role::StateGovernment => session
            .state
            .as_deref()
            .map(|bound| bound.eq_ignore_ascii_case(state))
            .unwrap_or(false),
    }
}

pub fn allows(session: Option<&Session>, capability: Capability) -> bool {
    let _ = capability;
    matches!(
        session.map(|s| s.role),
        Some(Role::CentralGovernment) | Some(Role::StateGovernment)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role, state: Option<&str>) -> Session {
        Session {
            email: "someone@rms.com".to_string(),
            name: "Someone".to_string(),
            login_time: String::new(),
            role,
            state: state.map(|s| s.to_string()),
        }
    }

    #[test]
    fn no_session_fails_closed() {
        assert!(!is_authenticated(None));
        assert!(!can_see_all_states(None));
        assert!(!can_see_state(None, "rajasthan"));
        assert!(!allows(None, Capability::NewProject));
    }

    #[test]
    fn central_and_public_see_every_state() {
        for role in [Role::CentralGovernment, Role::User] {
            let s = session(role, None);
            for state in ["rajasthan", "gujarat", "kerala", ""] {
                assert!(can_see_state(Some(&s), state));
            }
            assert!(can_see_all_states(Some(&s)));
        }
    }

    #[test]
    fn state_government_sees_only_its_bound_state() {
        let s = session(Role::StateGovernment, Some("Rajasthan"));
        assert!(can_see_state(Some(&s), "rajasthan"));
        assert!(can_see_state(Some(&s), "RAJASTHAN"));
        assert!(!can_see_state(Some(&s), "gujarat"));
        assert!(!can_see_all_states(Some(&s)));
    }

    #[test]
    fn state_government_without_binding_sees_nothing() {
        let s = session(Role::StateGovernment, None);
        assert!(!can_see_state(Some(&s), "rajasthan"));
    }

    #[test]
    fn only_government_roles_may_mutate() {
        for capability in Capability::ALL {
            assert!(allows(
                Some(&session(Role::CentralGovernment, None)),
                capability
            ));
            assert!(allows(
                Some(&session(Role::StateGovernment, Some("Rajasthan"))),
                capability
            ));
            assert!(!allows(Some(&session(Role::User, None)), capability));
        }
    }

    #[test]
    fn blank_identity_is_not_authenticated() {
        let mut s = session(Role::User, None);
        s.email = "   ".to_string();
        assert!(!is_authenticated(Some(&s)));
    }
}
