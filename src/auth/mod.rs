use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Viewer roles. The string forms double as the durable-storage
/// representation, so they must stay stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "central-government")]
    CentralGovernment,
    #[serde(rename = "state-government")]
    StateGovernment,
    #[serde(rename = "user")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CentralGovernment => "central-government",
            Role::StateGovernment => "state-government",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "central-government" => Some(Role::CentralGovernment),
            "state-government" => Some(Role::StateGovernment),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CredentialRecord {
    pub secret: String,
    pub role: Role,
    pub display_name: String,
    /// Bound state for state-government accounts, `None` otherwise.
    pub state: Option<String>,
}

/// Credential source seam: the demo table below is the default
/// implementation, a real backing store can be swapped in without touching
/// policy logic.
pub trait CredentialLookup {
    fn lookup(&self, identity: &str) -> Option<CredentialRecord>;
}

/// Hard-coded demo accounts. These are intentionally client-visible test
/// credentials and carry no security guarantees.
#[derive(Clone, Copy, Debug, Default)]
pub struct DemoCredentials;

const DEMO_TABLE: &[(&str, &str, Role, &str, Option<&str>)] = &[
    (
        "central@rms.com",
        "central123",
        Role::CentralGovernment,
        "Central Government Admin",
        None,
    ),
    (
        "state@rms.com",
        "state123",
        Role::StateGovernment,
        "State Government Officer",
        Some("Rajasthan"),
    ),
    ("user@rms.com", "user123", Role::User, "Public User", None),
];

impl CredentialLookup for DemoCredentials {
    fn lookup(&self, identity: &str) -> Option<CredentialRecord> {
        DEMO_TABLE
            .iter()
            .find(|(email, ..)| *email == identity)
            .map(|(_, secret, role, name, state)| CredentialRecord {
                secret: (*secret).to_string(),
                role: *role,
                display_name: (*name).to_string(),
                state: state.map(|s| s.to_string()),
            })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email address.")]
    UnknownIdentity,

    #[error("Invalid password.")]
    WrongSecret,
}

pub fn authenticate(
    lookup: &dyn CredentialLookup,
    identity: &str,
    secret: &str,
) -> Result<CredentialRecord, AuthError> {
    let record = lookup.lookup(identity).ok_or(AuthError::UnknownIdentity)?;
    if record.secret != secret {
        return Err(AuthError::WrongSecret);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_identity_is_rejected() {
        let err = authenticate(&DemoCredentials, "nobody@rms.com", "whatever").unwrap_err();
        assert_eq!(err, AuthError::UnknownIdentity);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let err = authenticate(&DemoCredentials, "central@rms.com", "nope").unwrap_err();
        assert_eq!(err, AuthError::WrongSecret);
    }

    #[test]
    fn state_account_carries_its_bound_state() {
        let record = authenticate(&DemoCredentials, "state@rms.com", "state123").unwrap();
        assert_eq!(record.role, Role::StateGovernment);
        assert_eq!(record.state.as_deref(), Some("Rajasthan"));
    }

    #[test]
    fn public_account_has_no_bound_state() {
        let record = authenticate(&DemoCredentials, "user@rms.com", "user123").unwrap();
        assert_eq!(record.role, Role::User);
        assert_eq!(record.state, None);
    }

    #[test]
    fn role_strings_round_trip() {
        for role in [Role::CentralGovernment, Role::StateGovernment, Role::User] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
    }
}
