//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rayon::prelude::*;

use folio_mdx::{parse_mdx_with, HeadingIds};
use folio_toc::{rendered_heading_ids, Display, TableOfContents, TrackerConfig};

use crate::assets::AssetPipeline;
use crate::content::{ContentError, ContentStore, Post};
use crate::render::render_markdown;
use crate::templates::{PostContext, PostSummary, SiteContext, TemplateEngine};

/// Configuration for building a blog.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Content root: posts live in `posts/`, the about page in `about.mdx`
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Path prefix every page URL starts with
    pub base_url: String,

    /// Absolute origin used in the sitemap and robots.txt
    pub site_url: String,

    /// Site title
    pub title: String,

    pub author: String,

    pub description: String,

    /// Number of posts shown on the home page
    pub latest_posts: usize,

    /// Suffix duplicate heading ids within a post
    pub unique_ids: bool,

    /// Table of contents settings embedded in post pages
    pub tracker: TrackerConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            site_url: "http://localhost:3000".to_string(),
            title: "Blog".to_string(),
            author: "Anonymous".to_string(),
            description: "Notes on software.".to_string(),
            latest_posts: 3,
            unique_ids: false,
            tracker: TrackerConfig::default(),
        }
    }
}

impl BuildConfig {
    pub fn posts_dir(&self) -> PathBuf {
        self.content_dir.join("posts")
    }

    pub fn about_path(&self) -> PathBuf {
        self.content_dir.join("about.mdx")
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of posts rendered
    pub posts: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse MDX: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("Failed to serialize {what}: {source}")]
    SerializeError {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    site: SiteContext,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let site = SiteContext {
            title: config.title.clone(),
            author: config.author.clone(),
            description: config.description.clone(),
            base_url: config.base_url.clone(),
        };

        Ok(Self {
            config,
            site,
            templates: TemplateEngine::new()?,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let posts = ContentStore::new(self.config.posts_dir())
            .with_unique_ids(self.config.unique_ids)
            .all_posts()?;

        let summaries: Vec<PostSummary> = posts
            .iter()
            .map(|post| PostSummary::from_post(post, &self.config.base_url))
            .collect();

        // Render posts in parallel
        posts
            .par_iter()
            .zip(summaries.par_iter())
            .map(|(post, summary)| self.build_post(post, summary))
            .collect::<Result<Vec<_>, _>>()?;

        self.build_home(&summaries)?;
        self.build_listing(&summaries)?;
        self.build_about()?;

        self.generate_assets()?;
        self.generate_search_index(&posts, &summaries)?;
        self.generate_sitemap(&posts, Utc::now().date_naive())?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: posts.len() + 3,
            posts: posts.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render one post with its table of contents.
    fn build_post(&self, post: &Post, summary: &PostSummary) -> Result<(), BuildError> {
        let content = render_markdown(
            &post.doc.content,
            HeadingIds::from_flag(self.config.unique_ids),
        );

        let mut toc = TableOfContents::new(self.config.tracker.clone())
            .with_unique_ids(self.config.unique_ids);
        toc.set_source(&post.doc.content);
        toc.reconcile(&rendered_heading_ids(&content));

        let sections = match toc.display() {
            Display::Shown => toc.sections().to_vec(),
            Display::Hidden | Display::Loading => Vec::new(),
        };

        let toc_settings = serde_json::to_string(&self.config.tracker.runtime_settings())
            .map_err(|source| BuildError::SerializeError {
                what: "table of contents settings",
                source,
            })?;

        let html = self.templates.render_post(
            &self.site,
            &PostContext {
                post: summary.clone(),
                content,
                sections,
                toc_settings,
            },
        )?;

        tracing::debug!(
            "Rendered post {} ({} headings)",
            post.slug,
            toc.headings().len()
        );

        self.write_page(&Path::new("posts").join(&post.slug), &html)
    }

    fn build_home(&self, summaries: &[PostSummary]) -> Result<(), BuildError> {
        let latest = &summaries[..summaries.len().min(self.config.latest_posts)];
        let html = self.templates.render_home(&self.site, latest)?;
        self.write_page(Path::new(""), &html)
    }

    fn build_listing(&self, summaries: &[PostSummary]) -> Result<(), BuildError> {
        let html = self.templates.render_posts(&self.site, summaries)?;
        self.write_page(Path::new("posts"), &html)
    }

    /// Render `about.mdx`, or a placeholder when there is none.
    fn build_about(&self) -> Result<(), BuildError> {
        let path = self.config.about_path();

        let content = if path.is_file() {
            let source = fs::read_to_string(&path).map_err(|e| BuildError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let ids = HeadingIds::from_flag(self.config.unique_ids);
            let doc = parse_mdx_with(&source, ids.clone()).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            Some(render_markdown(&doc.content, ids))
        } else {
            tracing::debug!("No about page at {}", path.display());
            None
        };

        let html = self.templates.render_about(&self.site, content.as_deref())?;
        self.write_page(Path::new("about"), &html)
    }

    /// Write `html` to `<output>/<dir>/index.html`.
    fn write_page(&self, dir: &Path, html: &str) -> Result<(), BuildError> {
        let dir = self.config.output_dir.join(dir);
        fs::create_dir_all(&dir).map_err(|e| BuildError::WriteError(e.to_string()))?;
        fs::write(dir.join("index.html"), html).map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("CSS minification failed, writing unminified: {}", e);
                css
            })
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("main.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate search index.
    fn generate_search_index(
        &self,
        posts: &[Post],
        summaries: &[PostSummary],
    ) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = posts
            .iter()
            .zip(summaries)
            .map(|(post, summary)| {
                // First prose lines, skipping headings, fences and components
                let content = post
                    .doc
                    .content
                    .lines()
                    .map(str::trim)
                    .filter(|l| {
                        !l.is_empty()
                            && !l.starts_with('#')
                            && !l.starts_with("```")
                            && !l.starts_with('<')
                    })
                    .take(10)
                    .collect::<Vec<_>>()
                    .join(" ");

                serde_json::json!({
                    "title": summary.title,
                    "description": summary.description.clone().unwrap_or_default(),
                    "url": summary.url,
                    "date": summary.date,
                    "tags": summary.tags,
                    "headings": post.doc.headings.iter().map(|h| &h.text).collect::<Vec<_>>(),
                    "content": content,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index).map_err(|source| {
            BuildError::SerializeError {
                what: "search index",
                source,
            }
        })?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, posts: &[Post], today: NaiveDate) -> Result<(), BuildError> {
        let origin = format!(
            "{}{}",
            self.config.site_url.trim_end_matches('/'),
            self.config.base_url.trim_end_matches('/')
        );

        let mut urls = vec![
            sitemap_entry(&format!("{}/", origin), today, "weekly", "1.0"),
            sitemap_entry(&format!("{}/posts/", origin), today, "weekly", "0.8"),
        ];

        for post in posts {
            let lastmod = post.metadata.parsed_date().unwrap_or(today);
            urls.push(sitemap_entry(
                &format!("{}/posts/{}/", origin, post.slug),
                lastmod,
                "monthly",
                "0.7",
            ));
        }

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nDisallow: /temp/\n\nSitemap: {}/sitemap.xml\nHost: {}\n",
            origin,
            self.config.site_url.trim_end_matches('/')
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

fn sitemap_entry(loc: &str, lastmod: NaiveDate, changefreq: &str, priority: &str) -> String {
    format!(
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>",
        loc,
        lastmod.format("%Y-%m-%d"),
        changefreq,
        priority
    )
}
