//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use folio_static::StaticBuilder;

use crate::config::FolioConfig;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building site...");

    let mut config = FolioConfig::load(config_path)?.build_config();
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = StaticBuilder::new(config)?.build().await?;

    tracing::info!(
        "Built {} pages ({} posts) in {}ms",
        result.pages,
        result.posts,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
