//! Markdown rendering of the jobs table and splicing it into a document.
//!
//! The document keeps everything outside the first
//! `<!-- JOBS-START -->` … `<!-- JOBS-END -->` pair untouched. Marker matching is
//! case-insensitive and tolerant of inner whitespace; the written block always
//! uses the canonical marker spelling.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::{NoExpand, Regex};
use std::path::Path;
use tokio::fs;

use crate::ingest::registry::source_names;
use crate::ingest::types::{Posting, SourceDescriptor};

pub const MARKER_START: &str = "<!-- JOBS-START -->";
pub const MARKER_END: &str = "<!-- JOBS-END -->";

const TABLE_HEADER: &str = "| Company | Job Title | Location | Apply |\n| --- | --- | --- | --- |";

fn marker_region() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<!--\s*JOBS-START\s*-->.*?<!--\s*JOBS-END\s*-->")
            .expect("marker regex")
    })
}

/// Make arbitrary board text safe for a table cell: decode HTML entities,
/// fold whitespace (including newlines), re-encode markup, escape pipes.
/// Re-encoding keeps board text from ever forming an HTML comment, so a title
/// cannot smuggle a JOBS marker into the block.
pub fn sanitize_cell(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    let folded = re_ws.replace_all(&decoded, " ");
    html_escape::encode_text(folded.trim()).replace('|', "\\|")
}

/// Percent-encode the characters that would end a Markdown link or split a
/// table row. Everything else is left as the board sent it.
pub fn sanitize_url(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for c in s.trim().chars() {
        if c.is_whitespace() || matches!(c, '|' | '(' | ')' | '<' | '>' | '[' | ']') {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        } else {
            out.push(c);
        }
    }
    out
}

/// `10/15/2026, 7:53:00 PM` (always UTC).
pub fn format_updated(ts: DateTime<Utc>) -> String {
    ts.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

pub fn render_row(p: &Posting) -> String {
    format!(
        "| **{company}** | **[{title}]({url})** | {location} | [ Apply]({url}) |",
        company = sanitize_cell(&p.company),
        title = sanitize_cell(&p.title),
        location = sanitize_cell(&p.location),
        url = sanitize_url(&p.apply_url),
    )
}

pub fn render_table(postings: &[Posting]) -> String {
    let mut out = String::from(TABLE_HEADER);
    for p in postings {
        out.push('\n');
        out.push_str(&render_row(p));
    }
    out
}

/// Everything that goes between (and including) the markers.
#[derive(Debug, Clone)]
pub struct JobsBlock<'a> {
    /// Rows to show, already capped.
    pub postings: &'a [Posting],
    /// Unique postings found, before the display cap.
    pub found: usize,
    pub sources: String,
    pub generated_at: DateTime<Utc>,
}

impl<'a> JobsBlock<'a> {
    pub fn new(
        unique: &'a [Posting],
        display_cap: usize,
        sources: &[SourceDescriptor],
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            postings: &unique[..unique.len().min(display_cap)],
            found: unique.len(),
            sources: source_names(sources),
            generated_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.found == 0
    }

    pub fn render(&self) -> String {
        format!(
            "{MARKER_START}\n\
             #  **Live Technical Writing Jobs** ({found} found)\n\
             \n\
             {table}\n\
             \n\
             **Sources:** {sources}  \n\
             *Updated: {updated} UTC*  \n\
             {MARKER_END}",
            found = self.found,
            table = render_table(self.postings),
            sources = self.sources,
            updated = format_updated(self.generated_at),
        )
    }
}

/// Replace the first marker region of `document` with `block`.
/// `None` when the document has no marker pair.
pub fn splice_block(document: &str, block: &str) -> Option<String> {
    let re = marker_region();
    if !re.is_match(document) {
        return None;
    }
    Some(re.replace(document, NoExpand(block)).into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The document was rewritten. Without markers it is rewritten unchanged.
    Updated { written: usize, markers_found: bool },
    /// Nothing to show; the document was not touched.
    NoJobs,
}

/// Read `path`, splice in the block and write it back. Read/write errors are
/// fatal for the run.
pub async fn update_document(path: &Path, block: &JobsBlock<'_>) -> Result<RenderOutcome> {
    if block.is_empty() {
        tracing::warn!("no writing jobs found; document left untouched");
        return Ok(RenderOutcome::NoJobs);
    }

    let document = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let rendered = block.render();
    let (updated, markers_found) = match splice_block(&document, &rendered) {
        Some(updated) => (updated, true),
        None => {
            tracing::warn!(path = %path.display(), "no JOBS-START/JOBS-END markers; content unchanged");
            (document, false)
        }
    };

    fs::write(path, updated)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(written = block.found, path = %path.display(), "jobs table written");
    for p in block.postings.iter().take(2) {
        tracing::info!(company = %p.company, title = %p.title, location = %p.location, "sample");
    }

    Ok(RenderOutcome::Updated {
        written: block.found,
        markers_found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn posting(title: &str) -> Posting {
        Posting {
            title: title.into(),
            company: "Postman".into(),
            location: "Berlin".into(),
            apply_url: "https://boards.example/1".into(),
            source_url: "https://boards.example".into(),
        }
    }

    #[test]
    fn row_layout() {
        assert_eq!(
            render_row(&posting("Technical Writer")),
            "| **Postman** | **[Technical Writer](https://boards.example/1)** | Berlin | [ Apply](https://boards.example/1) |"
        );
    }

    #[test]
    fn cells_are_sanitized() {
        assert_eq!(
            sanitize_cell("Docs &amp; Content |\n Lead "),
            "Docs &amp; Content \\| Lead"
        );
    }

    #[test]
    fn cells_cannot_form_markers() {
        let cell = sanitize_cell("Docs Lead &lt;!-- JOBS-END --&gt;");
        assert_eq!(cell, "Docs Lead &lt;!-- JOBS-END --&gt;");
        assert!(!cell.contains("<!--"));
        assert!(!marker_region().is_match(&format!("{MARKER_START}{cell}")));
    }

    #[test]
    fn urls_cannot_split_rows_or_links() {
        assert_eq!(
            sanitize_url(" https://x.test/a|b (c)\n "),
            "https://x.test/a%7Cb%20%28c%29"
        );
        let mut p = posting("Technical Writer");
        p.apply_url = "https://x.test/a|b".into();
        let row = render_row(&p);
        assert_eq!(
            row,
            "| **Postman** | **[Technical Writer](https://x.test/a%7Cb)** | Berlin | [ Apply](https://x.test/a%7Cb) |"
        );
        // four cells: five unescaped pipes
        assert_eq!(row.matches('|').count(), 5);
    }

    #[test]
    fn updated_stamp_is_us_style_utc() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 5, 19, 4, 9).unwrap();
        assert_eq!(format_updated(ts), "3/5/2026, 7:04:09 PM");
        let ts = Utc.with_ymd_and_hms(2026, 3, 5, 0, 15, 0).unwrap();
        assert_eq!(format_updated(ts), "3/5/2026, 12:15:00 AM");
    }

    #[test]
    fn block_counts_unique_but_caps_rows() {
        let all: Vec<Posting> = (0..15).map(|i| posting(&format!("Writer {i}"))).collect();
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let block = JobsBlock::new(&all, 12, &[], ts);
        let text = block.render();
        assert!(text.starts_with(MARKER_START));
        assert!(text.ends_with(MARKER_END));
        assert!(text.contains("(15 found)"));
        assert_eq!(text.matches("[ Apply]").count(), 12);
    }

    #[test]
    fn splice_is_case_insensitive_and_first_only() {
        let doc = "a\n<!-- jobs-start -->x<!--JOBS-END-->\nb\n<!-- JOBS-START -->y<!-- JOBS-END -->";
        let out = splice_block(doc, "NEW").unwrap();
        assert_eq!(out, "a\nNEW\nb\n<!-- JOBS-START -->y<!-- JOBS-END -->");
    }

    #[test]
    fn splice_does_not_expand_dollar_signs() {
        let out = splice_block("<!-- JOBS-START --><!-- JOBS-END -->", "$1 salary").unwrap();
        assert_eq!(out, "$1 salary");
    }

    #[test]
    fn splice_without_markers_is_none() {
        assert!(splice_block("# Jobs\n", "NEW").is_none());
    }
}
