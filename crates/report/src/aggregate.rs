//! Batch-wide statistics: per-kind counts and distinct namespaces.

use kubepeek_core::Resource;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindStat {
    pub kind: String,
    pub count: usize,
}

/// Occurrences per kind, sorted by kind name.
pub fn kind_stats(resources: &[Resource]) -> Vec<KindStat> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for r in resources {
        *counts.entry(r.kind.as_str()).or_default() += 1;
    }
    let mut out: Vec<KindStat> = counts
        .into_iter()
        .map(|(kind, count)| KindStat { kind: kind.to_string(), count })
        .collect();
    out.sort_by(|a, b| a.kind.cmp(&b.kind));
    out
}

/// Number of distinct namespaces among resources that declare one.
///
/// An empty set reports 1: a batch with no namespaced objects is assumed to
/// be a cluster-scoped query. This is a heuristic, not something the input
/// actually states.
pub fn namespace_count(resources: &[Resource]) -> usize {
    let seen: FxHashSet<String> = resources.iter().filter_map(Resource::namespace).collect();
    seen.len().max(1)
}
