//! Display projection of a single resource.
//!
//! The view carries a canonical YAML re-encoding plus the same content as a
//! JSON tree for structural rendering. Encoding problems degrade the view;
//! they never abort the batch.

use chrono::{DateTime, Utc};
use kubepeek_core::{age_label, classify_resource, Resource, StatusLabel};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("failed to encode resource: {0}")]
    Encode(#[source] serde_yaml::Error),
    #[error("failed to build value tree: {0}")]
    Tree(#[source] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceView {
    pub name: String,
    pub namespace: String,
    pub kind: String,
    pub api_version: String,
    pub age: String,
    pub status: StatusLabel,
    pub yaml: String,
    pub parsed: Json,
}

pub fn canonical_yaml(r: &Resource) -> Result<String, ProjectionError> {
    serde_yaml::to_string(r).map_err(ProjectionError::Encode)
}

/// Generic tree of a YAML text. Fails for content JSON cannot hold, such as
/// non-scalar mapping keys.
pub fn value_tree(yaml: &str) -> Result<Json, ProjectionError> {
    serde_yaml::from_str(yaml).map_err(ProjectionError::Tree)
}

fn error_tree(e: &ProjectionError) -> Json {
    serde_json::json!({ "error": e.to_string() })
}

/// `(yaml, parsed)` pair for a resource, with placeholders on failure.
pub fn display_forms(r: &Resource) -> (String, Json) {
    let yaml = match canonical_yaml(r) {
        Ok(y) => y,
        Err(e) => {
            counter!("report_projection_errors", 1u64);
            warn!(kind = %r.kind, name = %r.name(), error = %e, "resource re-encode failed");
            return (format!("# {}", e), error_tree(&e));
        }
    };
    match value_tree(&yaml) {
        Ok(tree) => (yaml, tree),
        Err(e) => {
            counter!("report_projection_errors", 1u64);
            warn!(kind = %r.kind, name = %r.name(), error = %e, "value tree unavailable");
            let tree = error_tree(&e);
            (yaml, tree)
        }
    }
}

pub fn project(r: &Resource, now: DateTime<Utc>) -> ResourceView {
    let (yaml, parsed) = display_forms(r);
    ResourceView {
        name: r.name(),
        namespace: r.namespace().unwrap_or_default(),
        kind: r.kind.clone(),
        api_version: r.api_version.clone(),
        age: age_label(r.creation_timestamp(), now),
        status: classify_resource(r),
        yaml,
        parsed,
    }
}
