//! Scaffold a blog in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    scaffold(Path::new("."), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio build' and then 'folio serve' to preview your blog.");

    Ok(())
}

/// Write the starter files under `root`. Existing files are kept unless `overwrite`.
fn scaffold(root: &Path, overwrite: bool) -> Result<()> {
    let posts_dir = root.join("content").join("posts");
    fs::create_dir_all(&posts_dir).context("Failed to create content/posts directory")?;

    let files = [
        (root.join("folio.toml"), DEFAULT_CONFIG),
        (posts_dir.join("hello-world.mdx"), DEFAULT_POST),
        (root.join("content").join("about.mdx"), DEFAULT_ABOUT),
    ];

    for (path, contents) in files {
        if path.exists() && !overwrite {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }

        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# folio configuration

[site]
title = "My Blog"
author = "Anonymous"
description = "Thoughts on development, tools, and technology."

# Absolute origin used in sitemap.xml and robots.txt
url = "http://localhost:4000"

# Path prefix for every page (for deployment under a sub-path)
base_url = "/"

# Posts live in <content_dir>/posts, the about page in <content_dir>/about.mdx
content_dir = "content"
output = "dist"

[build]
minify = true
latest_posts = 3

[toc]
# How long a heading must stay closest to the top before it becomes active
debounce_ms = 300

# Give repeated headings distinct ids (setup, setup-1, ...)
unique_ids = false
"#;

const DEFAULT_POST: &str = r#"---
title: Hello, World
date: 2025-01-05
description: The first post on this blog.
tags: [meta, folio]
---

Welcome! This post shows what a folio post can contain.

## Writing posts

Posts are MDX files in `content/posts`. The file name becomes the URL slug.

### Frontmatter

Every field is optional: `title`, `date`, `description` and `tags`.

### Headings

Level 1 and 2 headings start a section in the table of contents. Deeper
headings are listed under the section they follow.

## Code

```rust file=main.rs
fn main() {
    println!("Hello, world!");
}
```

## Installing packages

<PackageManagerTabs installCommand="npm install zod" uninstallCommand="npm uninstall zod" />

## Next steps

Run `folio build` and open the result with `folio serve`.
"#;

const DEFAULT_ABOUT: &str = r#"---
title: About
---

## About me

Write something about yourself here.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_starter_files() {
        let temp = tempdir().unwrap();

        scaffold(temp.path(), false).unwrap();

        assert!(temp.path().join("folio.toml").exists());
        assert!(temp.path().join("content/posts/hello-world.mdx").exists());
        assert!(temp.path().join("content/about.mdx").exists());
    }

    #[test]
    fn keeps_existing_files_without_overwrite() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("folio.toml"), "# mine\n").unwrap();

        scaffold(temp.path(), false).unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("folio.toml")).unwrap(), "# mine\n");

        scaffold(temp.path(), true).unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("folio.toml")).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn default_config_parses() {
        let config: crate::config::FolioConfig = toml::from_str(DEFAULT_CONFIG).unwrap();

        assert_eq!(config, crate::config::FolioConfig::default());
    }

    #[test]
    fn starter_post_parses() {
        let doc = folio_mdx::parse_mdx(DEFAULT_POST).unwrap();

        assert_eq!(doc.metadata().title.as_deref(), Some("Hello, World"));
        assert_eq!(doc.headings.len(), 6);
    }
}
