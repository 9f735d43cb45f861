//! Status classification for decoded resources.
//!
//! Every kind maps onto one [`StatusRule`]; the rule then reads the few
//! well-known keys of the `status` mapping (`phase`, `conditions`).

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    Running,
    Pending,
    Failed,
    Unknown,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Running => "running",
            StatusLabel::Pending => "pending",
            StatusLabel::Failed => "failed",
            StatusLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRule {
    /// `status.phase` of a workload instance (Pod).
    InstancePhase,
    /// `Available=True` condition of a rollout controller.
    ControllerConditions,
    /// Objects without runtime state worth reporting.
    AlwaysRunning,
    /// Any `*ready*`/`*available*` condition set to `True` (CRDs and the rest).
    GenericConditions,
}

/// Rule table keyed by kind.
pub fn rule_for(kind: &str) -> StatusRule {
    match kind {
        "Pod" => StatusRule::InstancePhase,
        "Deployment" | "ReplicaSet" | "StatefulSet" | "DaemonSet" => StatusRule::ControllerConditions,
        "Service" | "ConfigMap" | "Secret" => StatusRule::AlwaysRunning,
        _ => StatusRule::GenericConditions,
    }
}

impl StatusRule {
    pub fn apply(self, status: &Mapping) -> StatusLabel {
        match self {
            StatusRule::InstancePhase => match status.get("phase").and_then(Value::as_str) {
                Some("Running") => StatusLabel::Running,
                Some("Pending") => StatusLabel::Pending,
                Some("Failed") | Some("Error") => StatusLabel::Failed,
                _ => StatusLabel::Unknown,
            },
            StatusRule::ControllerConditions => {
                if conditions(status).any(|(t, ok)| ok && t == "Available") {
                    StatusLabel::Running
                } else {
                    StatusLabel::Pending
                }
            }
            StatusRule::AlwaysRunning => StatusLabel::Running,
            StatusRule::GenericConditions => {
                let healthy = conditions(status).any(|(t, ok)| {
                    let t = t.to_lowercase();
                    ok && (t.contains("ready") || t.contains("available"))
                });
                if healthy { StatusLabel::Running } else { StatusLabel::Unknown }
            }
        }
    }
}

/// Yields `(type, status == "True")` for every well-formed entry of
/// `status.conditions`. Entries without a string `type` are skipped.
fn conditions<'a>(status: &'a Mapping) -> impl Iterator<Item = (&'a str, bool)> + 'a {
    status
        .get("conditions")
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(Value::as_mapping)
        .filter_map(|c| {
            let ty = c.get("type").and_then(Value::as_str)?;
            let ok = c.get("status").and_then(Value::as_str) == Some("True");
            Some((ty, ok))
        })
}

/// Classify a `(kind, status)` pair. A missing or non-mapping status is
/// `unknown` regardless of kind.
pub fn classify(kind: &str, status: Option<&Value>) -> StatusLabel {
    match status.and_then(Value::as_mapping) {
        Some(m) => rule_for(kind).apply(m),
        None => StatusLabel::Unknown,
    }
}

pub fn classify_resource(r: &Resource) -> StatusLabel {
    classify(&r.kind, r.status.as_ref())
}
