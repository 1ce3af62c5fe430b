use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{CredentialRecord, Role};
use crate::store::{KvStore, StoreError};

pub const USER_KEY: &str = "user";
pub const ROLE_KEY: &str = "role";
pub const STATE_KEY: &str = "user-state";

/// Wire shape of the stored `user` key: `{email, name, loginTime}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredUser {
    email: String,
    name: String,
    #[serde(rename = "loginTime", default)]
    login_time: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub name: String,
    pub login_time: String,
    pub role: Role,
    /// Set iff `role` is `StateGovernment`.
    pub state: Option<String>,
}

impl Session {
    /// Built on a successful credential match; stamps the login time.
    pub fn start(email: &str, record: &CredentialRecord) -> Session {
        Session {
            email: email.to_string(),
            name: record.display_name.clone(),
            login_time: Utc::now().to_rfc3339(),
            role: record.role,
            state: if record.role == Role::StateGovernment {
                record.state.clone()
            } else {
                None
            },
        }
    }
}

/// Persists the session across the three durable keys and restores it at
/// process start. Malformed or partial stored state yields no session.
#[derive(Clone, Debug)]
pub struct SessionStore {
    store: KvStore,
}

impl SessionStore {
    pub fn new(store: KvStore) -> SessionStore {
        SessionStore { store }
    }

    pub fn restore(&self) -> Result<Option<Session>, StoreError> {
        let raw_user = self.store.get(USER_KEY)?;
        let raw_role = self.store.get(ROLE_KEY)?;
        let (Some(raw_user), Some(raw_role)) = (raw_user, raw_role) else {
            return Ok(None);
        };
        let Ok(user) = serde_json::from_str::<StoredUser>(&raw_user) else {
            return Ok(None);
        };
        let Some(role) = Role::parse(&raw_role) else {
            return Ok(None);
        };
        if user.email.trim().is_empty() {
            return Ok(None);
        }
        // A stray state key left by an older session is ignored for roles
        // that carry no binding.
        let state = match role {
            Role::StateGovernment => self
                .store
                .get(STATE_KEY)?
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            _ => None,
        };
        Ok(Some(Session {
            email: user.email,
            name: user.name,
            login_time: user.login_time,
            role,
            state,
        }))
    }

    pub fn persist(&self, session: &Session) -> Result<(), StoreError> {
        let user = StoredUser {
            email: session.email.clone(),
            name: session.name.clone(),
            login_time: session.login_time.clone(),
        };
        let encoded = serde_json::to_string(&user).unwrap_or_else(|_| "{}".to_string());
        self.store.set(USER_KEY, &encoded)?;
        self.store.set(ROLE_KEY, session.role.as_str())?;
        match session.state.as_deref() {
            Some(state) => self.store.set(STATE_KEY, state)?,
            None => self.store.remove(STATE_KEY)?,
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(USER_KEY)?;
        self.store.remove(ROLE_KEY)?;
        self.store.remove(STATE_KEY)?;
        Ok(())
    }
}
