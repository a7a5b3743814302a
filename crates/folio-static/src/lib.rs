//! Static site generator for folio blogs.
//!
//! Loads MDX posts, renders them with a per-post table of contents, and writes
//! the home, listing, post and about pages alongside assets, a sitemap and a
//! search index.

pub mod assets;
pub mod builder;
pub mod content;
pub mod render;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use content::{ContentError, ContentStore, Post};
pub use render::render_markdown;
