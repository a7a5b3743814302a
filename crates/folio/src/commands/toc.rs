//! Print the table of contents of a post.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use folio_mdx::{parse_mdx_with, HeadingIds};
use folio_toc::{SectionNode, TableOfContents};

use crate::config::FolioConfig;

/// Run the toc command.
pub fn run(config_path: &Path, file: &Path, json: bool) -> Result<()> {
    let config = FolioConfig::load(config_path)?;

    let source =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let toc = table_of_contents(&source, &config)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(toc.sections())?);
    } else if toc.sections().is_empty() {
        tracing::info!("No headings found in {}", file.display());
    } else {
        print!("{}", render_tree(toc.sections()));
    }

    Ok(())
}

fn table_of_contents(source: &str, config: &FolioConfig) -> Result<TableOfContents> {
    let doc = parse_mdx_with(source, HeadingIds::from_flag(config.toc.unique_ids))?;

    let mut toc = TableOfContents::new(config.tracker()).with_unique_ids(config.toc.unique_ids);
    toc.set_source(&doc.content);
    Ok(toc)
}

/// Indented outline, one heading per line.
fn render_tree(sections: &[SectionNode]) -> String {
    let mut out = String::new();

    for section in sections {
        out.push_str(&format!("{}  #{}\n", section.heading.text, section.id()));
        for child in &section.children {
            out.push_str(&format!("  {}  #{}\n", child.text, child.id));
        }
    }

    out
}
