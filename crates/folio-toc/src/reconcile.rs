//! Matching extracted headings against rendered output.
//!
//! Headings are extracted from raw text before rendering finishes, and the
//! renderer may drop or rewrite some of them. Only ids that exist as elements in
//! the output are kept.

use std::collections::HashSet;
use std::sync::LazyLock;

use folio_mdx::HeadingRecord;
use regex::Regex;

static HEADING_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<h[1-6]\b[^>]*?\sid="([^"]*)""#).expect("heading id pattern is valid")
});

/// Ids of every heading element in an HTML fragment.
pub fn rendered_heading_ids(html: &str) -> HashSet<String> {
    HEADING_ID_RE
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

/// Keep only headings whose id was rendered.
pub fn retain_rendered(headings: &[HeadingRecord], rendered: &HashSet<String>) -> Vec<HeadingRecord> {
    headings
        .iter()
        .filter(|heading| rendered.contains(&heading.id))
        .cloned()
        .collect()
}
