//! Site configuration (`folio.toml`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_static::BuildConfig;
use folio_toc::TrackerConfig;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct FolioConfig {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub toc: TocSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SiteSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_description")]
    pub description: String,
    /// Absolute origin for sitemap links
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: default_author(),
            description: default_description(),
            url: default_url(),
            base_url: default_base_url(),
            content_dir: default_content_dir(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
    #[serde(default = "default_latest_posts")]
    pub latest_posts: usize,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
            latest_posts: default_latest_posts(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct TocSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Suffix duplicate heading ids (`setup`, `setup-1`) instead of sharing one
    #[serde(default)]
    pub unique_ids: bool,
}

impl Default for TocSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            unique_ids: false,
        }
    }
}

fn default_title() -> String {
    "My Blog".to_string()
}
fn default_author() -> String {
    "Anonymous".to_string()
}
fn default_description() -> String {
    "Thoughts on development, tools, and technology.".to_string()
}
fn default_url() -> String {
    "http://localhost:4000".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_minify() -> bool {
    true
}
fn default_latest_posts() -> usize {
    3
}
fn default_debounce_ms() -> u64 {
    300
}

impl FolioConfig {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig::default().with_debounce(Duration::from_millis(self.toc.debounce_ms))
    }

    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            content_dir: self.site.content_dir.clone(),
            output_dir: self.site.output.clone(),
            minify: self.build.minify,
            base_url: self.site.base_url.clone(),
            site_url: self.site.url.clone(),
            title: self.site.title.clone(),
            author: self.site.author.clone(),
            description: self.site.description.clone(),
            latest_posts: self.build.latest_posts,
            unique_ids: self.toc.unique_ids,
            tracker: self.tracker(),
        }
    }
}
