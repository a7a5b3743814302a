//! MDX document parser.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use crate::codeblock::{extract_filename, CodeBlock, Language};
use crate::frontmatter::{extract_frontmatter, FrontmatterError, PostMetadata};
use crate::heading::{extract_headings_with, HeadingIds, HeadingRecord};
use crate::markdown_options;

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<PostMetadata>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Extracted code blocks
    pub code_blocks: Vec<CodeBlock>,

    /// Headings in document order
    pub headings: Vec<HeadingRecord>,
}

impl ParsedDoc {
    /// Metadata, or the empty default when the document has no frontmatter.
    pub fn metadata(&self) -> PostMetadata {
        self.frontmatter.clone().unwrap_or_default()
    }
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse an MDX document, letting duplicate headings share an id.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    parse_mdx_with(source, HeadingIds::colliding())
}

/// Parse an MDX document with an explicit heading id strategy.
pub fn parse_mdx_with(source: &str, mut ids: HeadingIds) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    // Lines consumed by the frontmatter block, so block line numbers match the file
    let consumed = source.len() - content.len();
    let line_offset = source[..consumed].matches('\n').count();

    let mut code_blocks = Vec::new();
    let mut current: Option<(String, usize, String)> = None; // (info, line, source)

    for (event, range) in Parser::new_ext(content, markdown_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                let line = content[..range.start].matches('\n').count() + 1 + line_offset;
                current = Some((info, line, String::new()));
            }

            Event::Text(text) => {
                if let Some((_, _, ref mut code)) = current {
                    code.push_str(&text);
                }
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, line, code)) = current.take() {
                    let mut block = CodeBlock::new(Language::from_info(&info), code, line);
                    block.filename = extract_filename(&info);
                    code_blocks.push(block);
                }
            }

            _ => {}
        }
    }

    let headings = extract_headings_with(content, &mut ids);

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        code_blocks,
        headings,
    })
}
