//! MDX parsing for folio posts.
//!
//! This crate parses post files: YAML frontmatter, fenced code blocks, the
//! line-oriented heading index used by the table of contents,
//! `<PackageManagerTabs />` snippets and `<MigrationChecklist />` elements.

pub mod checklist;
pub mod codeblock;
pub mod frontmatter;
pub mod heading;
pub mod package_manager;
pub mod parser;

pub use checklist::{find_checklists, ChecklistItem, ChecklistSection, MigrationChecklist};
pub use codeblock::{CodeBlock, Language};
pub use frontmatter::{format_date, parse_date, PostMetadata};
pub use heading::{extract_headings, extract_headings_with, generate_id, HeadingIds, HeadingRecord};
pub use package_manager::{convert_command, PackageManager, PackageManagerTabs};
pub use parser::{parse_mdx, parse_mdx_with, ParseError, ParsedDoc};

/// Markdown extensions enabled for posts.
pub fn markdown_options() -> pulldown_cmark::Options {
    use pulldown_cmark::Options;

    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}
