//! Post loading from a directory of MDX files.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use folio_mdx::{parse_mdx_with, HeadingIds, ParsedDoc, PostMetadata};

/// A post loaded from disk.
#[derive(Debug, Clone)]
pub struct Post {
    /// File stem, used in the post URL
    pub slug: String,

    /// Frontmatter (empty when the file has none)
    pub metadata: PostMetadata,

    /// Parsed document
    pub doc: ParsedDoc,
}

impl Post {
    /// Title, falling back to the slug.
    pub fn display_title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or(&self.slug)
    }
}

/// Errors that can occur while loading posts.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Reads posts from a flat directory of `.mdx` files.
#[derive(Debug, Clone)]
pub struct ContentStore {
    dir: PathBuf,
    unique_ids: bool,
}

impl ContentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            unique_ids: false,
        }
    }

    /// Give duplicate headings within a post distinct ids.
    pub fn with_unique_ids(mut self, unique: bool) -> Self {
        self.unique_ids = unique;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every post, newest first.
    ///
    /// Dated posts come first, newest to oldest; undated posts follow in slug
    /// order. A missing directory yields no posts.
    pub fn all_posts(&self) -> Result<Vec<Post>, ContentError> {
        let mut posts = self
            .post_paths()?
            .into_iter()
            .map(|(slug, path)| self.load(slug, &path))
            .collect::<Result<Vec<_>, _>>()?;

        posts.sort_by(compare_posts);

        tracing::debug!("Loaded {} posts from {}", posts.len(), self.dir.display());

        Ok(posts)
    }

    /// Load one post, or `None` if no file has that slug.
    pub fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let path = self.dir.join(format!("{}.mdx", slug));

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => self.load(slug.to_string(), &path).map(Some),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ContentError::Read { path, source }),
        }
    }

    /// Slugs of every post, in directory order sorted by name.
    pub fn all_slugs(&self) -> Result<Vec<String>, ContentError> {
        Ok(self
            .post_paths()?
            .into_iter()
            .map(|(slug, _)| slug)
            .collect())
    }

    fn post_paths(&self) -> Result<Vec<(String, PathBuf)>, ContentError> {
        if !self.dir.exists() {
            tracing::warn!("Posts directory not found: {}", self.dir.display());
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ContentError::Read {
                path: self.dir.clone(),
                source: e.into(),
            })?;
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("mdx") {
                continue;
            }

            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!("Skipping post with non UTF-8 name: {}", path.display());
                continue;
            };

            paths.push((slug.to_string(), path.to_path_buf()));
        }

        Ok(paths)
    }

    fn load(&self, slug: String, path: &Path) -> Result<Post, ContentError> {
        let source = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = parse_mdx_with(&source, HeadingIds::from_flag(self.unique_ids)).map_err(|e| {
            ContentError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        Ok(Post {
            slug,
            metadata: doc.metadata(),
            doc,
        })
    }
}

fn compare_posts(a: &Post, b: &Post) -> Ordering {
    match (a.metadata.parsed_date(), b.metadata.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_post(dir: &Path, slug: &str, frontmatter: &str) {
        fs::write(
            dir.join(format!("{}.mdx", slug)),
            format!("---\n{}\n---\n\n## Body of {}\n", frontmatter, slug),
        )
        .unwrap();
    }

    #[test]
    fn sorts_newest_first_then_undated_by_slug() {
        let temp = tempdir().unwrap();
        write_post(temp.path(), "older", "title: Older\ndate: 2023-02-01");
        write_post(temp.path(), "newer", "title: Newer\ndate: 2024-11-20");
        write_post(temp.path(), "zeta", "title: Zeta");
        write_post(temp.path(), "alpha", "title: Alpha\ndate: not a date");
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let posts = ContentStore::new(temp.path()).all_posts().unwrap();

        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older", "alpha", "zeta"]);
        assert_eq!(posts[0].display_title(), "Newer");
        assert_eq!(posts[0].doc.headings[0].id, "body-of-newer");
    }

    #[test]
    fn missing_directory_is_empty() {
        let temp = tempdir().unwrap();

        let store = ContentStore::new(temp.path().join("nope"));

        assert!(store.all_posts().unwrap().is_empty());
        assert!(store.all_slugs().unwrap().is_empty());
    }

    #[test]
    fn looks_up_posts_by_slug() {
        let temp = tempdir().unwrap();
        write_post(temp.path(), "hello-world", "date: 2024-01-01");
        let store = ContentStore::new(temp.path());

        let post = store.post_by_slug("hello-world").unwrap().unwrap();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.display_title(), "hello-world");

        assert!(store.post_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn lists_slugs() {
        let temp = tempdir().unwrap();
        write_post(temp.path(), "b", "title: B");
        write_post(temp.path(), "a", "title: A");

        let slugs = ContentStore::new(temp.path()).all_slugs().unwrap();

        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[test]
    fn reports_malformed_frontmatter() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("broken.mdx"), "---\ntitle: [oops\n---\n").unwrap();

        let err = ContentStore::new(temp.path()).all_posts().unwrap_err();

        assert!(matches!(err, ContentError::Parse { .. }));
    }
}
