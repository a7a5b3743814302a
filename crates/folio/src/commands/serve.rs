//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::FolioConfig;

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, open_browser: bool) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => FolioConfig::load(config_path)?.site.output,
    };

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'folio build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    if open_browser {
        let url = format!("http://{}", addr);
        if let Err(e) = open::that(&url) {
            tracing::debug!("Could not open browser: {}", e);
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}
