use std::collections::BTreeMap;

use crate::auth::Role;
use crate::session::Session;

/// Fixed state -> districts dataset shipped with the binary, read-only.
const STATES_JSON: &str = include_str!("../../data/states.json");

#[derive(Clone, Debug, Default)]
pub struct StateDataset {
    states: BTreeMap<String, Vec<String>>,
}

impl StateDataset {
    pub fn load_embedded() -> Result<StateDataset, String> {
        let states = serde_json::from_str(STATES_JSON)
            .map_err(|e| format!("invalid embedded states dataset: {e}"))?;
        Ok(StateDataset { states })
    }

    /// Keys in natural (sorted) order.
    pub fn state_keys(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(|k| k.as_str())
    }

    pub fn contains(&self, state_key: &str) -> bool {
        self.states.contains_key(state_key)
    }

    pub fn districts(&self, state_key: &str) -> Option<&[String]> {
        self.states.get(state_key).map(|d| d.as_slice())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// "uttar-pradesh" -> "Uttar Pradesh".
pub fn display_case(key: &str) -> String {
    key.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase a user-supplied name into the dataset key form:
/// "Uttar Pradesh" -> "uttar-pradesh".
pub fn slugify(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateOption {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct StateOptions {
    /// Locked option sets cannot be overridden by the viewer.
    pub locked: bool,
    pub options: Vec<StateOption>,
}

/// State government viewers get exactly their bound state, pre-selected and
/// locked so the scope cannot be widened from the filter control. Everyone
/// else gets the full dataset in key order.
pub fn options_for(session: Option<&Session>, dataset: &StateDataset) -> StateOptions {
    if let Some(session) = session {
        if session.role == Role::StateGovernment {
            let options = session
                .state
                .as_deref()
                .map(|bound| {
                    vec![StateOption {
                        key: slugify(bound),
                        label: bound.to_string(),
                        selected: true,
                    }]
                })
                .unwrap_or_default();
            return StateOptions {
                locked: true,
                options,
            };
        }
    }
    StateOptions {
        locked: false,
        options: dataset
            .state_keys()
            .map(|key| StateOption {
                key: key.to_string(),
                label: display_case(key),
                selected: false,
            })
            .collect(),
    }
}
