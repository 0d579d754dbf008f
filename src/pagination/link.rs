//! Link header parsing (RFC 8288)
//!
//! Recovers the total page count from the `last` relation of a
//! `Link: <url>; rel="first", <url>; rel="last"` response header.

use url::Url;

/// Query parameter carrying the page number in relation URLs
pub const PAGE_PARAM: &str = "_page";

/// Relation URLs found in a Link header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl RelLinks {
    fn set(&mut self, rel: &str, url: &str) {
        let slot = match rel {
            "first" => &mut self.first,
            "last" => &mut self.last,
            "next" => &mut self.next,
            "prev" | "previous" => &mut self.previous,
            _ => return,
        };
        *slot = Some(url.to_string());
    }
}

/// Parse a Link header into its known relations.
///
/// Entries without a `<url>` or without a `rel` parameter are skipped.
/// A `rel` may list several space-separated relation types.
pub fn parse_link_header(header: &str) -> RelLinks {
    let mut links = RelLinks::default();

    for entry in split_entries(header) {
        let mut url = None;
        let mut rel = None;

        for segment in entry.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') && segment.len() >= 2 {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some((key, value)) = segment.split_once('=') {
                if key.trim().eq_ignore_ascii_case("rel") {
                    rel = Some(value.trim().trim_matches('"').trim_matches('\''));
                }
            }
        }

        if let (Some(u), Some(r)) = (url, rel) {
            for name in r.split_whitespace() {
                links.set(&name.to_ascii_lowercase(), u.trim());
            }
        }
    }

    links
}

/// Total number of pages according to the `last` relation.
///
/// Falls back to 1 when there is no `last` link, the URL cannot be
/// parsed, or its `_page` parameter is missing or not an integer.
pub fn total_pages_from_link(header: &str) -> u32 {
    parse_link_header(header)
        .last
        .as_deref()
        .and_then(page_param)
        .unwrap_or(1)
}

/// Read the `_page` query parameter from an absolute or relative URL
fn page_param(raw: &str) -> Option<u32> {
    let url = Url::parse(raw).or_else(|_| {
        Url::parse("http://localhost/").and_then(|base| base.join(raw))
    });
    let url = url.ok()?;

    url.query_pairs()
        .find(|(key, _)| key == PAGE_PARAM)
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Split a header on commas that are not inside `<...>`
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(header[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(header[start..].trim());

    entries.into_iter().filter(|e| !e.is_empty()).collect()
}
