// src/ingest/extract.rs
//! Turns a board's raw body into normalized [`Posting`]s.
//!
//! Boards answer with different JSON layouts: RemoteOK returns a bare array,
//! Greenhouse wraps the list in `jobs`, others use `data`, `postings` or
//! `job_postings`. The layouts are tried in a fixed order and the first one
//! present wins. Inside an entry every field is optional; a missing or oddly
//! typed field falls back to a default instead of dropping the source.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ingest::types::{Posting, SourceDescriptor, SourceScan};

pub const DEFAULT_LOCATION: &str = "Remote";

const TITLE_FIELDS: [&str; 3] = ["position", "title", "name"];
const APPLY_URL_FIELDS: [&str; 3] = ["apply_url", "absolute_url", "url"];
const SOURCE_URL_FIELDS: [&str; 1] = ["url"];
const CITY_FIELDS: [&str; 2] = ["city", "name"];

/// Where the list of entries lives inside a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingShape {
    TopLevelArray,
    Field(&'static str),
}

const LISTING_SHAPES: [ListingShape; 5] = [
    ListingShape::TopLevelArray,
    ListingShape::Field("jobs"),
    ListingShape::Field("data"),
    ListingShape::Field("postings"),
    ListingShape::Field("job_postings"),
];

impl ListingShape {
    /// `None` when this shape is absent. A present wrapper that is not an array
    /// still wins, with no entries.
    fn project(self, root: &Value) -> Option<&[Value]> {
        match self {
            ListingShape::TopLevelArray => root.as_array().map(Vec::as_slice),
            ListingShape::Field(name) => root
                .get(name)
                .filter(|v| is_present(v))
                .map(|v| v.as_array().map(Vec::as_slice).unwrap_or(&[])),
        }
    }
}

fn listing_entries(root: &Value) -> &[Value] {
    LISTING_SHAPES
        .iter()
        .find_map(|shape| shape.project(root))
        .unwrap_or(&[])
}

/// Null, `false`, `0` and `""` count as "not there".
fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First non-empty string among `fields`. Non-string values are skipped.
fn first_str<'a>(entry: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|f| entry.get(*f))
        .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
}

/// Lower-cased relevance terms. Matching is plain substring containment
/// against the lower-cased title, without word boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Trims, lower-cases and de-duplicates (first occurrence wins); empty
    /// terms are dropped.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in terms {
            let t = t.as_ref().trim().to_lowercase();
            if !t.is_empty() && !out.contains(&t) {
                out.push(t);
            }
        }
        Self(out)
    }

    pub fn matches(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.0.iter().any(|kw| title.contains(kw.as_str()))
    }

    pub fn terms(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new([
            "writer",
            "writing",
            "documentation",
            "docs",
            "technical writer",
            "content",
            "documentation engineer",
            "technical content",
            "developer advocate",
            "technical evangelist",
            "staff writer",
            "knowledge",
            "developer relations",
            "technical marketing",
        ])
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(v: Vec<String>) -> Self {
        Self::new(v)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(k: KeywordSet) -> Self {
        k.0
    }
}

fn derive_location(entry: &Value) -> String {
    match entry.get("location") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(obj @ Value::Object(_)) => {
            let mut loc = first_str(obj, &CITY_FIELDS)
                .unwrap_or(DEFAULT_LOCATION)
                .to_string();
            if let Some(country) = first_str(obj, &["country"]) {
                loc.push_str(", ");
                loc.push_str(country);
            }
            loc
        }
        _ => DEFAULT_LOCATION.to_string(),
    }
}

/// Normalize one entry, or `None` when it has no title or no keyword hits.
pub fn posting_from_entry(
    entry: &Value,
    source: &SourceDescriptor,
    keywords: &KeywordSet,
) -> Option<Posting> {
    let title = first_str(entry, &TITLE_FIELDS)?;
    if !keywords.matches(title) {
        tracing::debug!(source = %source.name, title, "no keyword match");
        return None;
    }

    Some(Posting {
        title: title.to_string(),
        company: source.name.clone(),
        location: derive_location(entry),
        apply_url: first_str(entry, &APPLY_URL_FIELDS)
            .unwrap_or(source.url.as_str())
            .to_string(),
        source_url: first_str(entry, &SOURCE_URL_FIELDS)
            .unwrap_or(source.url.as_str())
            .to_string(),
    })
}

/// Matching postings from an already parsed response, in source order, at
/// most `cap` of them.
pub fn find_postings(
    root: &Value,
    source: &SourceDescriptor,
    keywords: &KeywordSet,
    cap: usize,
) -> Vec<Posting> {
    listing_entries(root)
        .iter()
        .filter_map(|entry| posting_from_entry(entry, source, keywords))
        .take(cap)
        .collect()
}

/// Parse a raw body and extract postings. An unparseable body (including the
/// empty string a failed fetch produces) is logged and yields an empty scan.
pub fn scan_body(
    body: &str,
    source: &SourceDescriptor,
    keywords: &KeywordSet,
    cap: usize,
) -> SourceScan {
    match serde_json::from_str::<Value>(body) {
        Ok(root) => SourceScan {
            source: source.name.clone(),
            postings: find_postings(&root, source, keywords, cap),
            parse_failed: false,
        },
        Err(e) => {
            tracing::warn!(source = %source.name, shape = ?source.shape, error = %e, "JSON parse failed");
            metrics::counter!("jobs_parse_failures_total").increment(1);
            SourceScan {
                source: source.name.clone(),
                postings: Vec::new(),
                parse_failed: true,
            }
        }
    }
}
