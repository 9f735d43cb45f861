//! kubepeek report: per-resource views plus batch aggregates, bundled into
//! the document handed to presentation layers as JSON.

#![forbid(unsafe_code)]

use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use kubepeek_core::Resource;
use kubepeek_ingest::{parse_resources_with, ParseOptions};
use metrics::histogram;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod aggregate;
pub mod project;

pub use aggregate::{kind_stats, namespace_count, KindStat};
pub use project::{canonical_yaml, display_forms, project, value_tree, ProjectionError, ResourceView};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Where the stream came from (file path, `-` for stdin).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub generated_at: String,
    pub total_resources: usize,
    pub namespace_count: usize,
    pub kind_stats: Vec<KindStat>,
    pub resources: Vec<ResourceView>,
}

impl Report {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    source: Option<String>,
    now: Option<DateTime<Utc>>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Pin the reference instant used for ages and `generatedAt`.
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn build(&self, resources: &[Resource]) -> Report {
        let t0 = Instant::now();
        let now = self.now.unwrap_or_else(Utc::now);
        let views: Vec<ResourceView> = resources.iter().map(|r| project(r, now)).collect();
        let report = Report {
            source: self.source.clone(),
            generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            total_resources: resources.len(),
            namespace_count: namespace_count(resources),
            kind_stats: kind_stats(resources),
            resources: views,
        };
        histogram!("report_build_ms", t0.elapsed().as_secs_f64() * 1000.0);
        debug!(
            total = report.total_resources,
            kinds = report.kind_stats.len(),
            namespaces = report.namespace_count,
            "report built"
        );
        report
    }
}

/// Whole pipeline with default options: split, decode, project, aggregate.
pub fn build_report(blob: &str) -> Report {
    build_report_with(blob, ParseOptions::default(), &ReportBuilder::new())
}

pub fn build_report_with(blob: &str, opts: ParseOptions, builder: &ReportBuilder) -> Report {
    let resources = parse_resources_with(blob, opts);
    builder.build(&resources)
}
