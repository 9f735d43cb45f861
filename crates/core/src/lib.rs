//! kubepeek core types: decoded resources plus the per-resource derivations
//! (status label, age bucket) that do not depend on the rest of the batch.

#![forbid(unsafe_code)]

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

pub mod age;
pub mod status;

pub use age::{age_label, age_label_now, format_elapsed, UNKNOWN_AGE};
pub use status::{classify, classify_resource, rule_for, StatusLabel, StatusRule};

/// One decoded Kubernetes object.
///
/// Only `kind` and a handful of `metadata` keys are ever interpreted; the
/// payload sections are carried as generic YAML values and re-emitted as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resource {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(rename = "stringData", default, skip_serializing_if = "Option::is_none")]
    pub string_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Value>,
    #[serde(rename = "roleRef", default, skip_serializing_if = "Option::is_none")]
    pub role_ref: Option<Value>,
    /// Remaining top-level fields (`type`, `binaryData`, `immutable`, ...).
    #[serde(flatten)]
    pub extra: Mapping,
}

// Decoded by hand from a mapping: a derived `flatten` buffers values through
// serde's private content type, which rejects YAML tags (`type: !custom x`).
impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Mapping::deserialize(deserializer)?;
        Ok(Resource {
            api_version: take(&mut map, "apiVersion")?,
            kind: take(&mut map, "kind")?,
            metadata: take(&mut map, "metadata")?,
            spec: take(&mut map, "spec")?,
            status: take(&mut map, "status")?,
            data: take(&mut map, "data")?,
            string_data: take(&mut map, "stringData")?,
            rules: take(&mut map, "rules")?,
            subjects: take(&mut map, "subjects")?,
            role_ref: take(&mut map, "roleRef")?,
            extra: map,
        })
    }
}

/// Remove `key` from `map` and decode it; absent keys yield the default.
fn take<T, E>(map: &mut Mapping, key: &str) -> Result<T, E>
where
    T: DeserializeOwned + Default,
    E: de::Error,
{
    match map.shift_remove(key) {
        Some(v) => serde_yaml::from_value(v).map_err(|e| E::custom(format_args!("{}: {}", key, e))),
        None => Ok(T::default()),
    }
}

impl Resource {
    /// Raw `metadata.<key>` value, if present.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    /// `metadata.name` rendered as text, empty when absent.
    pub fn name(&self) -> String {
        self.meta("name").and_then(scalar_text).unwrap_or_default()
    }

    /// `metadata.namespace` rendered as text; `None` for cluster-scoped objects.
    pub fn namespace(&self) -> Option<String> {
        self.meta("namespace").and_then(scalar_text)
    }

    pub fn creation_timestamp(&self) -> Option<&Value> {
        self.meta("creationTimestamp")
    }
}

/// Render a metadata value the way it would print in a table cell.
/// `null` counts as absent.
pub fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(t) => scalar_text(&t.value),
        other => serde_yaml::to_string(other).ok().map(|s| s.trim_end().to_string()),
    }
}
