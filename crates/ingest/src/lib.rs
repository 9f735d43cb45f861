//! kubepeek ingest: split multi-document `kubectl -o yaml` output and decode
//! each document into resources, flattening `kind: List` wrappers.
//!
//! Decoding is best-effort. Documents that are not resources are skipped and
//! counted, never reported as errors.

#![forbid(unsafe_code)]

use kubepeek_core::Resource;
use metrics::counter;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

/// Kind of the wrapper `kubectl get` emits for multi-object results.
pub const LIST_KIND: &str = "List";

// ---------------- splitting ----------------

/// Lazy iterator over the non-empty, trimmed documents of a YAML stream.
/// Cloning it restarts from the same position.
#[derive(Debug, Clone)]
pub struct Documents<'a> {
    rest: Option<&'a str>,
}

pub fn split_documents(blob: &str) -> Documents<'_> {
    Documents { rest: Some(blob) }
}

impl<'a> Iterator for Documents<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let (doc, tail) = split_first(self.rest?);
            self.rest = tail;
            let doc = doc.trim();
            if !doc.is_empty() {
                return Some(doc);
            }
        }
    }
}

/// Cut at the first separator line: `(before, Some(after))`, or `(all, None)`.
/// Whatever follows the `---` marker on its line starts the next document.
fn split_first(s: &str) -> (&str, Option<&str>) {
    let mut offset = 0usize;
    for line in s.split_inclusive('\n') {
        if is_separator(line) {
            return (&s[..offset], Some(&s[offset + MARKER.len()..]));
        }
        offset += line.len();
    }
    (s, None)
}

const MARKER: &str = "---";

/// A document-start marker at column 0, followed by end of line or whitespace.
fn is_separator(line: &str) -> bool {
    match line.strip_prefix(MARKER) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

// ---------------- decoding ----------------

/// Transient `kind: List` wrapper; only `items` survives decoding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceList {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<Resource>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Drop list items whose own `kind` is empty. Standalone documents always
    /// need a kind; list items are accepted as-is unless this is set.
    pub require_item_kind: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub documents: usize,
    pub lists: usize,
    pub list_items: usize,
    pub singles: usize,
    pub skipped: usize,
    pub items_dropped: usize,
}

/// Outcome of decoding one document.
#[derive(Debug, Clone)]
pub enum Decoded {
    List(Vec<Resource>),
    Single(Resource),
    Skipped(String),
}

pub fn decode_document(doc: &str) -> Decoded {
    let value: Value = match serde_yaml::from_str(doc) {
        Ok(v) => v,
        Err(e) => return Decoded::Skipped(e.to_string()),
    };
    // Structs would also accept a sequence positionally; objects are mappings.
    if !value.is_mapping() {
        return Decoded::Skipped("document is not a mapping".to_string());
    }
    if value.get("kind").and_then(Value::as_str) == Some(LIST_KIND) {
        if let Ok(list) = serde_yaml::from_value::<ResourceList>(value.clone()) {
            return Decoded::List(list.items);
        }
    }
    match serde_yaml::from_value::<Resource>(value) {
        Ok(r) if !r.kind.is_empty() => Decoded::Single(r),
        Ok(_) => Decoded::Skipped("document has no kind".to_string()),
        Err(e) => Decoded::Skipped(e.to_string()),
    }
}

pub fn parse_resources(blob: &str) -> Vec<Resource> {
    parse_resources_with(blob, ParseOptions::default())
}

pub fn parse_resources_with(blob: &str, opts: ParseOptions) -> Vec<Resource> {
    parse_resources_with_stats(blob, opts).0
}

/// Decode every document of `blob` in order. Never fails; unusable
/// documents only show up in [`ParseStats::skipped`].
pub fn parse_resources_with_stats(blob: &str, opts: ParseOptions) -> (Vec<Resource>, ParseStats) {
    let mut out = Vec::new();
    let mut stats = ParseStats::default();
    for (idx, doc) in split_documents(blob).enumerate() {
        stats.documents += 1;
        match decode_document(doc) {
            Decoded::List(items) => {
                stats.lists += 1;
                stats.list_items += items.len();
                for item in items {
                    if opts.require_item_kind && item.kind.is_empty() {
                        stats.items_dropped += 1;
                        continue;
                    }
                    out.push(item);
                }
            }
            Decoded::Single(r) => {
                stats.singles += 1;
                out.push(r);
            }
            Decoded::Skipped(reason) => {
                debug!(doc = idx, reason = %reason, "skipping non-resource document");
                stats.skipped += 1;
            }
        }
    }
    counter!("ingest_documents_total", stats.documents as u64);
    counter!("ingest_documents_skipped", stats.skipped as u64);
    counter!("ingest_list_items_total", stats.list_items as u64);
    debug!(resources = out.len(), ?stats, "decoded resource stream");
    (out, stats)
}
