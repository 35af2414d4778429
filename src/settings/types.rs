use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A typed key that may be absent, explicitly `null`, or set
///
/// The outer `Option` tracks presence and the inner one tracks `null`, so a
/// document written back has the same shape it was read with.
pub type Nullable<T> = Option<Option<T>>;

/// The agent CLI's settings document (`~/.marubot/config.json`)
///
/// Only the keys the dashboard edits are typed. Everything else is kept in
/// the flattened `extra` maps and written back untouched, so saving from the
/// dashboard never drops settings owned by the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Agent defaults section
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub agents: Nullable<AgentsSection>,

    /// Credentials keyed by provider name (`openai`, `gemini`, ...)
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub providers: Nullable<BTreeMap<String, Option<ProviderCredentials>>>,

    /// Unrecognized top-level keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `agents` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentsSection {
    /// Defaults applied to every agent run
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub defaults: Nullable<AgentDefaults>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `agents.defaults`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDefaults {
    /// Model identifier, e.g. `gemini-1.5-pro`
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub model: Nullable<String>,

    /// Agent workspace directory
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub workspace: Nullable<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Credential pair for one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Nullable<String>,

    /// Custom endpoint; the agent picks its built-in default when absent
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_base: Nullable<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Only called for keys that are present, so `null` lands in `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn value<T>(field: &Nullable<T>) -> Option<&T> {
    field.as_ref().and_then(Option::as_ref)
}

impl AgentSettings {
    /// `agents.defaults.model`, if set
    pub fn model(&self) -> Option<&str> {
        self.defaults()
            .and_then(|d| value(&d.model))
            .map(String::as_str)
    }

    /// `agents.defaults.workspace`, if set
    pub fn workspace(&self) -> Option<&str> {
        self.defaults()
            .and_then(|d| value(&d.workspace))
            .map(String::as_str)
    }

    /// Names of providers that have a non-empty API key
    pub fn configured_providers(&self) -> Vec<&str> {
        value(&self.providers)
            .into_iter()
            .flatten()
            .filter(|(_, creds)| {
                creds
                    .as_ref()
                    .and_then(|c| value(&c.api_key))
                    .is_some_and(|k| !k.is_empty())
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    fn defaults(&self) -> Option<&AgentDefaults> {
        value(&self.agents).and_then(|a| value(&a.defaults))
    }
}
