//! Code block extraction and parsing.

/// Programming language of a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Tsx,
    Jsx,
    TypeScript,
    JavaScript,
    Rust,
    Html,
    Css,
    Json,
    Toml,
    Yaml,
    Bash,
    #[default]
    Text,
}

impl Language {
    /// Parse language from code fence info string.
    pub fn from_info(info: &str) -> Self {
        let lang = info.split_whitespace().next().unwrap_or("");
        match lang.to_lowercase().as_str() {
            "tsx" => Self::Tsx,
            "jsx" => Self::Jsx,
            "ts" | "typescript" => Self::TypeScript,
            "js" | "javascript" => Self::JavaScript,
            "rs" | "rust" => Self::Rust,
            "html" => Self::Html,
            "css" => Self::Css,
            "json" => Self::Json,
            "toml" => Self::Toml,
            "yml" | "yaml" => Self::Yaml,
            "bash" | "sh" | "shell" | "zsh" => Self::Bash,
            _ => Self::Text,
        }
    }

    /// Short name used for highlighting classes and the block label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tsx => "tsx",
            Self::Jsx => "jsx",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Rust => "rust",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::Bash => "bash",
            Self::Text => "text",
        }
    }

    /// CSS class for the `<code>` element, e.g. `language-bash`.
    pub fn as_class(&self) -> String {
        format!("language-{}", self.name())
    }
}

/// A fenced code block from a post.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Unique identifier for this block (format: block-{line_number})
    pub id: String,

    /// Programming language
    pub language: Language,

    /// Source code content
    pub source: String,

    /// Line number where the block starts (1-indexed)
    pub line_number: usize,

    /// Optional filename hint from info string
    pub filename: Option<String>,
}

impl CodeBlock {
    /// Create a new code block.
    pub fn new(language: Language, source: String, line_number: usize) -> Self {
        Self {
            id: format!("block-{}", line_number),
            language,
            source,
            line_number,
            filename: None,
        }
    }
}

/// Extract filename from code fence info string if present.
///
/// Supports formats like:
/// - `tsx filename="Button.tsx"`
/// - `tsx file=Button.tsx`
pub fn extract_filename(info: &str) -> Option<String> {
    if let Some(start) = info.find("filename=\"") {
        let rest = &info[start + 10..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }

    if let Some(start) = info.find("file=") {
        let rest = &info[start + 5..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let filename = rest[..end].trim_matches('"');
        if !filename.is_empty() {
            return Some(filename.to_string());
        }
    }

    None
}
