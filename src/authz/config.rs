use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Claim looked up when no claim name is configured.
pub const DEFAULT_GROUPS_CLAIM: &str = "groups";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one group is required")]
    NoGroups,
}

/// Raw gate settings, as supplied by the host (env, JSON, ...).
///
/// Field names follow the `groups` / `groupsClaim` JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<String>,
    #[serde(default = "default_groups_claim", deserialize_with = "null_as_default")]
    pub groups_claim: String,
}

// `null` reads like an unset value; an empty claim name is normalized later.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_groups_claim() -> String {
    DEFAULT_GROUPS_CLAIM.to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            groups_claim: default_groups_claim(),
        }
    }
}

impl GateConfig {
    pub fn with_groups<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn groups_claim(mut self, claim: impl Into<String>) -> Self {
        self.groups_claim = claim.into();
        self
    }
}

/// Validated, immutable allow-list + claim name.
///
/// Only obtainable through [`GroupPolicy::new`], so `groups` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPolicy {
    groups: BTreeSet<String>,
    groups_claim: String,
}

impl GroupPolicy {
    pub fn new(config: GateConfig) -> Result<Self, ConfigError> {
        if config.groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }

        let groups_claim = if config.groups_claim.is_empty() {
            default_groups_claim()
        } else {
            config.groups_claim
        };

        Ok(Self {
            groups: config.groups.into_iter().collect(),
            groups_claim,
        })
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    pub fn groups_claim(&self) -> &str {
        &self.groups_claim
    }

    /// Exact, case-sensitive lookup. Returns the allow-list's own copy of the name.
    pub fn allowed(&self, group: &str) -> Option<&str> {
        self.groups.get(group).map(String::as_str)
    }
}

impl TryFrom<GateConfig> for GroupPolicy {
    type Error = ConfigError;

    fn try_from(config: GateConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_groups_are_rejected() {
        let err = GroupPolicy::new(GateConfig::default()).unwrap_err();

        assert_eq!(err, ConfigError::NoGroups);
        assert_eq!(err.to_string(), "at least one group is required");
    }

    #[test]
    fn empty_claim_name_falls_back_to_groups() {
        let config = GateConfig::with_groups(["dev"]).groups_claim("");
        let policy = GroupPolicy::new(config).unwrap();

        assert_eq!(policy.groups_claim(), "groups");
    }

    #[test]
    fn custom_claim_name_is_kept() {
        let config = GateConfig::with_groups(["dev"]).groups_claim("roles");
        let policy = GroupPolicy::try_from(config).unwrap();

        assert_eq!(policy.groups_claim(), "roles");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let policy = GroupPolicy::new(GateConfig::with_groups(["dev", "ops"])).unwrap();

        assert_eq!(policy.allowed("dev"), Some("dev"));
        assert_eq!(policy.allowed("Dev"), None);
        assert_eq!(policy.allowed("admin"), None);
    }

    #[test]
    fn duplicate_groups_collapse() {
        let policy = GroupPolicy::new(GateConfig::with_groups(["ops", "dev", "ops"])).unwrap();

        let groups: Vec<&str> = policy.groups().iter().map(String::as_str).collect();
        assert_eq!(groups, ["dev", "ops"]);
    }

    #[test]
    fn json_without_claim_name_uses_default() {
        let config: GateConfig = serde_json::from_str(r#"{"groups": ["dev"]}"#).unwrap();

        assert_eq!(config.groups, ["dev"]);
        assert_eq!(config.groups_claim, "groups");
    }

    #[test]
    fn json_claim_name_is_camel_case() {
        let config: GateConfig =
            serde_json::from_str(r#"{"groups": ["dev"], "groupsClaim": "roles"}"#).unwrap();

        assert_eq!(config.groups_claim, "roles");
    }

    #[test]
    fn json_null_claim_name_uses_default() {
        let config: GateConfig =
            serde_json::from_str(r#"{"groups": ["dev"], "groupsClaim": null}"#).unwrap();
        let policy = GroupPolicy::new(config).unwrap();

        assert_eq!(policy.groups_claim(), "groups");
    }

    #[test]
    fn json_null_groups_fails_validation() {
        let config: GateConfig = serde_json::from_str(r#"{"groups": null}"#).unwrap();

        assert_eq!(GroupPolicy::new(config), Err(ConfigError::NoGroups));
    }

    #[test]
    fn json_without_groups_fails_validation() {
        let config: GateConfig = serde_json::from_str(r#"{"groupsClaim": ""}"#).unwrap();

        assert_eq!(GroupPolicy::new(config), Err(ConfigError::NoGroups));
    }
}
