//! Rendering of registry snapshots into external representations.
//!
//! Input is the raw comma-separated `services` value and a requested
//! format. Splitting an empty string yields one empty-string ID, which
//! simply matches nothing; this edge case is preserved, not special-cased.
//!
//! Status strings are rendered raw in every format, HTML included. A
//! status containing markup will be interpreted by the browser; callers
//! that accept status pushes from untrusted writers must account for
//! that. Deliberate, documented behavior — not escaped here.
//!
//! Rendering materializes the full result in memory, sized to the number
//! of requested IDs, before any bytes are written. Unbounded request lists
//! are a known limitation.

use chrono::{DateTime, Local, Utc};
use livestat_common::{Error, Result, ServiceId};
use std::collections::HashMap;

use crate::types::ServiceRecord;

/// Freshness window advertised on every render.
pub const CACHE_CONTROL: &str = "max-age=300";

const HTML_STYLES: &str = "\
<style>
table { border-collapse: collapse; }
th, td { border: 1px solid black; padding: 0.5em; }
</style>";

/// Requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Html,
    Plaintext,
}

impl Format {
    /// Parses a format name; anything unrecognized is a client error.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Format::Json),
            "html" => Ok(Format::Html),
            "plaintext" => Ok(Format::Plaintext),
            other => Err(Error::invalid_format(other)),
        }
    }

    /// Content type of the rendered output.
    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Html => "text/html",
            Format::Plaintext => "text/plain",
        }
    }
}

/// Splits a raw comma-separated `services` value into IDs.
///
/// An empty input yields one empty-string ID (which matches nothing).
pub fn split_services(raw: &str) -> Vec<ServiceId> {
    raw.split(',').map(ServiceId::from).collect()
}

/// Renders the matching subset of a snapshot in the requested format.
///
/// `ids` is the requested order, duplicates and all; `records` is the
/// snapshot projection for those IDs. Unknown IDs are omitted, never an
/// error.
pub fn render(
    format: Format,
    ids: &[ServiceId],
    records: &HashMap<ServiceId, ServiceRecord>,
) -> String {
    match format {
        Format::Json => render_json(ids, records),
        Format::Html => render_html(ids, records),
        Format::Plaintext => render_plaintext(ids, records),
    }
}

/// Object mapping ID to `{"status", "lastUpdated"}`. Duplicate IDs
/// collapse because object keys are unique; the key order carries no
/// meaning.
fn render_json(ids: &[ServiceId], records: &HashMap<ServiceId, ServiceRecord>) -> String {
    let mut out = serde_json::Map::new();
    for id in ids {
        if let Some(record) = records.get(id) {
            out.insert(
                id.to_string(),
                serde_json::json!({
                    "status": record.status,
                    "lastUpdated": local_time_string(&record.last_updated),
                }),
            );
        }
    }
    serde_json::Value::Object(out).to_string()
}

/// One table, one row per matched ID in request order, duplicates rendered
/// once per occurrence.
fn render_html(ids: &[ServiceId], records: &HashMap<ServiceId, ServiceRecord>) -> String {
    let mut out = String::new();
    out.push_str("<html><head>");
    out.push_str(HTML_STYLES);
    out.push_str("</head><body>");
    out.push_str("<table><tr><th>Service</th><th>Status</th><th>Last Updated</th></tr>");
    for id in ids {
        if let Some(record) = records.get(id) {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                id,
                record.status,
                local_time_string(&record.last_updated)
            ));
        }
    }
    out.push_str("</table></body></html>");
    out
}

/// One block per matched ID in request order, blocks separated by a blank
/// line.
fn render_plaintext(ids: &[ServiceId], records: &HashMap<ServiceId, ServiceRecord>) -> String {
    let blocks: Vec<String> = ids
        .iter()
        .filter_map(|id| {
            records.get(id).map(|record| {
                format!(
                    "{}\nsince: {}\nis: {}\n",
                    id,
                    local_time_string(&record.last_updated),
                    record.status
                )
            })
        })
        .collect();
    blocks.join("\n")
}

/// ISO-8601-like local-time display string. The process timezone (`TZ`)
/// applies as usual.
fn local_time_string(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %z")
        .to_string()
}
