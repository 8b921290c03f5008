//! `settings.json` schema
//!
//! Only the keys judge-sync acts on are typed; everything else is carried
//! through `extra` so a load/save cycle never drops judge-specific fields.
//!
//! # Example
//!
//! ```json
//! {
//!   "title": "Sumas",
//!   "alias": "sumas",
//!   "Limits": { "TimeLimit": "1s", "MemoryLimit": 33554432 },
//!   "Validator": { "Name": "token-caseless" },
//!   "misc": { "languages": "all", "admins": ["alice"], "tags": ["math"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validator name that requires a bundled validator source file.
pub const CUSTOM_VALIDATOR: &str = "custom";

/// Complete problem settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemSettings {
    /// Human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Remote problem alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Resource limits
    #[serde(rename = "Limits", default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
    /// Output validator selection
    #[serde(rename = "Validator", default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<ValidatorSettings>,
    /// Publishing metadata: visibility, languages, admins, tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc: Option<Misc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProblemSettings {
    /// Whether the problem ships its own validator program.
    pub fn has_custom_validator(&self) -> bool {
        self.validator
            .as_ref()
            .and_then(|v| v.name.as_deref())
            .is_some_and(|name| name == CUSTOM_VALIDATOR)
    }

    /// `misc`, or an empty section when absent.
    pub fn misc(&self) -> Misc {
        self.misc.clone().unwrap_or_default()
    }
}

/// A limit given either as a bare number or as a string with a unit suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitValue {
    Number(f64),
    Text(String),
}

/// `Limits` section. Times are milliseconds, sizes are bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Limits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<LimitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<LimitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_limit: Option<LimitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_limit: Option<LimitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_wall_time: Option<LimitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_wall_time_limit: Option<LimitValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `Validator` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorSettings {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `misc` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Misc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_clarifications: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_score_policy: Option<String>,
    /// Usernames that should administer the problem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admins: Option<Vec<String>>,
    /// Group aliases that should administer the problem
    #[serde(rename = "admin-groups", default, skip_serializing_if = "Option::is_none")]
    pub admin_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_typed_sections_and_keeps_unknown_keys() {
        let settings: ProblemSettings = serde_json::from_value(json!({
            "title": "Sumas",
            "alias": "sumas",
            "Limits": { "TimeLimit": "1s", "MemoryLimit": 33554432, "Custom": 1 },
            "Validator": { "Name": "custom", "Tolerance": 1e-9 },
            "misc": { "admin-groups": ["staff"], "alias_hint": "x" },
            "Cases": []
        }))
        .unwrap();

        let limits = settings.limits.as_ref().unwrap();
        assert_eq!(limits.time_limit, Some(LimitValue::Text("1s".into())));
        assert_eq!(limits.memory_limit, Some(LimitValue::Number(33554432.0)));
        assert!(limits.extra.contains_key("Custom"));
        assert!(settings.has_custom_validator());
        assert_eq!(settings.misc().admin_groups, Some(vec!["staff".to_string()]));
        assert!(settings.extra.contains_key("Cases"));
    }

    #[test]
    fn missing_validator_is_not_custom() {
        let settings = ProblemSettings::default();
        assert!(!settings.has_custom_validator());
    }
}
