//! Line-oriented heading extraction.
//!
//! Headings are read straight from the source text rather than from the parsed
//! markdown tree, so the table of contents can be built before rendering
//! finishes. Fenced code regions are skipped.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading pattern is valid"));

/// A single heading extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HeadingRecord {
    /// Anchor ID derived from the heading text
    pub id: String,
    /// Display label
    pub text: String,
    /// Heading level (1-6)
    pub level: u8,
}

impl HeadingRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            level,
        }
    }

    /// Whether this heading opens a top-level section in the navigation tree.
    pub fn is_top_level(&self) -> bool {
        self.level <= 2
    }
}

/// Convert heading text to an anchor ID.
///
/// Lowercases, drops everything outside `[a-z0-9\s-]`, turns whitespace runs into
/// a single hyphen and trims hyphens from both ends. Anchors authored outside the
/// site may link to these ids, so the output must not change.
pub fn generate_id(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut id = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            // Separators only count between two kept characters
            if pending_hyphen && !id.is_empty() {
                id.push('-');
            }
            pending_hyphen = false;
            id.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    id
}

/// Assigns anchor IDs to headings in document order.
///
/// The default strategy lets duplicate headings share an id. [`HeadingIds::unique`]
/// tracks the ids handed out so far and suffixes repeats with `-1`, `-2`, ...
/// The extractor and the HTML renderer must use the same strategy so that
/// navigation links resolve.
#[derive(Debug, Clone, Default)]
pub struct HeadingIds {
    seen: Option<HashSet<String>>,
}

impl HeadingIds {
    /// Duplicate headings collide on the same id.
    pub fn colliding() -> Self {
        Self { seen: None }
    }

    /// Duplicate headings receive a numeric suffix.
    pub fn unique() -> Self {
        Self {
            seen: Some(HashSet::new()),
        }
    }

    /// Build the strategy from a `unique_ids` flag.
    pub fn from_flag(unique: bool) -> Self {
        if unique {
            Self::unique()
        } else {
            Self::colliding()
        }
    }

    /// Assign the id for the next heading, or `None` if the text yields no anchor.
    pub fn assign(&mut self, text: &str) -> Option<String> {
        let base = generate_id(text);
        if base.is_empty() {
            return None;
        }

        let Some(seen) = self.seen.as_mut() else {
            return Some(base);
        };

        if seen.insert(base.clone()) {
            return Some(base);
        }

        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if seen.insert(candidate.clone()) {
                return Some(candidate);
            }
            n += 1;
        }
    }
}

/// Whether a line opens or closes a fenced code block.
pub fn is_fence_delimiter(line: &str) -> bool {
    line.trim().starts_with("```")
}

/// Extract headings from raw document text.
///
/// Duplicate ids are kept as-is. Use [`extract_headings_with`] to pick a
/// different id strategy.
pub fn extract_headings(source: &str) -> Vec<HeadingRecord> {
    extract_headings_with(source, &mut HeadingIds::colliding())
}

/// Extract headings, assigning ids through `ids`.
pub fn extract_headings_with(source: &str, ids: &mut HeadingIds) -> Vec<HeadingRecord> {
    let mut headings = Vec::new();
    let mut in_code_block = false;

    for line in source.split('\n') {
        if is_fence_delimiter(line) {
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            continue;
        }

        let Some(caps) = HEADING_RE.captures(line) else {
            continue;
        };

        let level = caps[1].len() as u8;
        let text = caps[2].trim();

        if !has_alphanumeric(text) {
            continue;
        }

        let Some(id) = ids.assign(text) else {
            continue;
        };

        headings.push(HeadingRecord::new(id, text, level));
    }

    headings
}

fn has_alphanumeric(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generates_ids() {
        assert_eq!(generate_id("Hello, World!"), "hello-world");
        assert_eq!(generate_id("API Reference"), "api-reference");
        assert_eq!(generate_id("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(generate_id("Step 1 -- Setup"), "step-1-setup");
        assert_eq!(generate_id("just ---"), "just");
        assert_eq!(generate_id("--- ---"), "");
        assert_eq!(generate_id("   "), "");
        assert_eq!(generate_id("Café au lait"), "caf-au-lait");
        assert_eq!(generate_id("snake_case_name"), "snakecasename");
    }

    #[test]
    fn extracts_scenario_document() {
        let headings = extract_headings("# Title\n## Intro\ntext\n### Detail\n## Next");

        assert_eq!(
            headings,
            vec![
                HeadingRecord::new("title", "Title", 1),
                HeadingRecord::new("intro", "Intro", 2),
                HeadingRecord::new("detail", "Detail", 3),
                HeadingRecord::new("next", "Next", 2),
            ]
        );
    }

    #[test]
    fn skips_fenced_blocks() {
        let source = "## Before\n```bash\n# not a heading\n```\n## After\n  ```\n## Hidden\n```";

        let ids: Vec<_> = extract_headings(source).into_iter().map(|h| h.id).collect();

        assert_eq!(ids, vec!["before", "after"]);
    }

    #[test]
    fn unclosed_fence_hides_the_rest() {
        let ids: Vec<_> = extract_headings("# One\n```\n# Two\n# Three")
            .into_iter()
            .map(|h| h.id)
            .collect();

        assert_eq!(ids, vec!["one"]);
    }

    #[test]
    fn skips_punctuation_only_headings() {
        let source = "# ---\n## !!!\n###    \n#### ¿¡\n## Real";

        let headings = extract_headings(source);

        assert_eq!(headings, vec![HeadingRecord::new("real", "Real", 2)]);
    }

    #[test]
    fn rejects_non_headings() {
        let source = "#NoSpace\n####### Seven\n text # inline\n    # indented";

        assert!(extract_headings(source).is_empty());
    }

    #[test]
    fn trims_text_and_handles_crlf() {
        let headings = extract_headings("##   Spaced Out   \r\n### Windows\r\n");

        assert_eq!(
            headings,
            vec![
                HeadingRecord::new("spaced-out", "Spaced Out", 2),
                HeadingRecord::new("windows", "Windows", 3),
            ]
        );
    }

    #[test]
    fn keeps_duplicates_by_default() {
        let ids: Vec<_> = extract_headings("## Usage\n## Usage\n## Usage")
            .into_iter()
            .map(|h| h.id)
            .collect();

        assert_eq!(ids, vec!["usage", "usage", "usage"]);
    }

    #[test]
    fn unique_strategy_suffixes_duplicates() {
        let mut ids = HeadingIds::unique();
        let headings = extract_headings_with("## Usage\n## Usage-1\n## Usage\n## Usage", &mut ids);

        let ids: Vec<_> = headings.into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["usage", "usage-1", "usage-2", "usage-3"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let source = "# A\n## B\n```\n## C\n```\n### D\n## B";

        assert_eq!(extract_headings(source), extract_headings(source));
    }

    #[test]
    fn top_level_is_level_two_or_less() {
        assert!(HeadingRecord::new("a", "A", 1).is_top_level());
        assert!(HeadingRecord::new("b", "B", 2).is_top_level());
        assert!(!HeadingRecord::new("c", "C", 3).is_top_level());
    }
}
