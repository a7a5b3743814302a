//! Frontmatter extraction and parsing.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Parsed frontmatter from a post.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PostMetadata {
    /// Post title
    #[serde(default)]
    pub title: Option<String>,

    /// Publication date (`YYYY-MM-DD` or RFC 3339)
    #[serde(default)]
    pub date: Option<String>,

    /// Short summary for cards and SEO
    #[serde(default)]
    pub description: Option<String>,

    /// Topic tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostMetadata {
    /// The publication date, if present and well-formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

/// Parse a frontmatter date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Format a date the long en-US way, e.g. "January 5, 2025".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Extract frontmatter from MDX content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<PostMetadata>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // An empty block is valid and carries no metadata
    let metadata = if yaml_content.is_empty() {
        PostMetadata::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(metadata), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Migrating to pnpm
date: 2025-01-05
description: Notes from moving a monorepo
tags:
  - tooling
  - javascript
---

# Migrating to pnpm
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title.as_deref(), Some("Migrating to pnpm"));
        assert_eq!(fm.date.as_deref(), Some("2025-01-05"));
        assert_eq!(
            fm.description.as_deref(),
            Some("Notes from moving a monorepo")
        );
        assert_eq!(fm.tags, vec!["tooling", "javascript"]);
        assert!(content.starts_with("# Migrating to pnpm"));
    }

    #[test]
    fn all_fields_are_optional() {
        let (fm, content) = extract_frontmatter("---\n---\nBody").unwrap();

        assert_eq!(fm, Some(PostMetadata::default()));
        assert_eq!(content, "Body");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn parses_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        assert_eq!(parse_date("2024-03-09"), Some(expected));
        assert_eq!(parse_date("2024-03-09T10:00:00Z"), Some(expected));
        assert_eq!(parse_date("March 9th"), None);
    }

    #[test]
    fn formats_dates_long_form() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();

        assert_eq!(format_date(date), "January 5, 2025");
    }
}
