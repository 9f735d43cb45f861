#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use kubepeek_core::StatusLabel;
use kubepeek_ingest::{parse_resources, ParseOptions};
use kubepeek_report::{build_report, build_report_with, KindStat, ReportBuilder};

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

const STREAM: &str = r#"apiVersion: v1
kind: List
items:
- apiVersion: v1
  kind: Pod
  metadata:
    name: api-1
    namespace: a
    creationTimestamp: "2024-06-01T00:00:00Z"
  status:
    phase: Running
- apiVersion: v1
  kind: Pod
  metadata:
    name: api-2
    namespace: b
    creationTimestamp: "2024-06-01T23:15:00Z"
  status:
    phase: Pending
- apiVersion: v1
  kind: Pod
  metadata:
    name: job-x
    namespace: a
    creationTimestamp: "2024-06-02T01:00:00Z"
- apiVersion: v1
  kind: Service
  metadata:
    name: api
    namespace: a
  status:
    loadBalancer: {}
---
this is: [not, closed
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: api
  namespace: b
  creationTimestamp: "2024-05-31T00:57:00Z"
status:
  conditions:
  - type: Available
    status: "True"
---
apiVersion: cert-manager.io/v1
kind: Certificate
metadata:
  name: tls
  namespace: a
status:
  conditions:
  - type: Ready
    status: "False"
"#;

#[test]
fn views_follow_decode_order() {
    let now = at("2024-06-02T01:03:00Z");
    let report = ReportBuilder::new().source("-").now(now).build(&parse_resources(STREAM));
    let names: Vec<_> = report.resources.iter().map(|v| format!("{}/{}", v.kind, v.name)).collect();
    assert_eq!(
        names,
        vec!["Pod/api-1", "Pod/api-2", "Pod/job-x", "Service/api", "Deployment/api", "Certificate/tls"]
    );
    assert_eq!(report.total_resources, report.resources.len());
    assert_eq!(report.source.as_deref(), Some("-"));
    assert_eq!(report.generated_at, "2024-06-02T01:03:00Z");
}

#[test]
fn statuses_and_ages() {
    let now = at("2024-06-02T01:03:00Z");
    let report = ReportBuilder::new().now(now).build(&parse_resources(STREAM));
    let got: Vec<_> = report.resources.iter().map(|v| (v.status, v.age.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (StatusLabel::Running, "1d1h"),
            (StatusLabel::Pending, "1h48m"),
            (StatusLabel::Unknown, "3m"),
            (StatusLabel::Running, "unknown"),
            (StatusLabel::Running, "2d0h"),
            (StatusLabel::Unknown, "unknown"),
        ]
    );
}

#[test]
fn aggregates() {
    let report = build_report(STREAM);
    assert_eq!(report.total_resources, 6);
    assert_eq!(report.namespace_count, 2);
    assert_eq!(
        report.kind_stats,
        vec![
            KindStat { kind: "Certificate".into(), count: 1 },
            KindStat { kind: "Deployment".into(), count: 1 },
            KindStat { kind: "Pod".into(), count: 3 },
            KindStat { kind: "Service".into(), count: 1 },
        ]
    );
}

#[test]
fn cluster_scoped_batch_reports_one_namespace() {
    let report = build_report("kind: Node\nmetadata:\n  name: n1\n---\nkind: ClusterRole\nmetadata:\n  name: view\n");
    assert_eq!(report.namespace_count, 1);
    assert_eq!(report.total_resources, 2);
}

#[test]
fn empty_input_gives_empty_report() {
    let report = build_report("");
    assert_eq!(report.total_resources, 0);
    assert!(report.resources.is_empty());
    assert!(report.kind_stats.is_empty());
    assert_eq!(report.namespace_count, 1);
}

#[test]
fn strict_items_flow_through_the_builder() {
    let blob = "kind: List\nitems:\n- kind: Pod\n- metadata: {name: orphan}\n";
    let lax = build_report(blob);
    assert_eq!(lax.total_resources, 2);
    assert_eq!(lax.kind_stats.len(), 2, "empty kind is its own bucket");
    let strict = build_report_with(blob, ParseOptions { require_item_kind: true }, &ReportBuilder::new());
    assert_eq!(strict.total_resources, 1);
}

#[test]
fn json_bundle_uses_camel_case_fields() {
    let report = ReportBuilder::new().now(at("2024-06-02T01:03:00Z")).build(&parse_resources(STREAM));
    let v: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
    assert_eq!(v["totalResources"], 6);
    assert_eq!(v["namespaceCount"], 2);
    assert_eq!(v["kindStats"][2], serde_json::json!({ "kind": "Pod", "count": 3 }));
    let first = &v["resources"][0];
    assert_eq!(first["apiVersion"], "v1");
    assert_eq!(first["status"], "running");
    assert_eq!(first["parsed"]["metadata"]["namespace"], "a");
    assert!(first["yaml"].as_str().unwrap().contains("name: api-1"));
    assert!(v.get("source").is_none());
}
