//! # HTTP Surface
//!
//! The browser talks to tackboard through a handful of JSON routes:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /api/data` | Whole board document |
//! | `POST /api/save-all` | Replace the whole document |
//! | `POST /api/upload` | Multipart upload, field `file` |
//! | `GET /download/{name}` | Attachment bytes |
//! | `DELETE /api/delete-file/{name}` | Remove an attachment |
//! | `POST /api/open-file/{name}` | Open with the default application |
//! | `GET /api/files` | Attachment listing |
//!
//! Handlers stay thin: they pull the request apart, hand the work to
//! [`BoardApi`] on the blocking pool, and wrap the outcome in a
//! `{"success": ...}` envelope. Status codes come from [`error::ApiError`].

pub mod error;
mod routes;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use tackboardapp::api::BoardApi;
use tackboardapp::config::BoardConfig;
use tackboardapp::launcher::{CommandLauncher, Launcher};
use tracing::{info, warn};

pub struct AppState<L: Launcher> {
    api: Arc<BoardApi<L>>,
    index_dir: Option<PathBuf>,
}

impl<L: Launcher> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            index_dir: self.index_dir.clone(),
        }
    }
}

pub fn router<L>(api: Arc<BoardApi<L>>, index_dir: Option<PathBuf>) -> Router
where
    L: Launcher + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(routes::index::<L>))
        .route("/api/data", get(routes::load_document::<L>))
        .route("/api/save-all", post(routes::save_document::<L>))
        .route("/api/upload", post(routes::upload::<L>))
        .route("/download/{*filename}", get(routes::download::<L>))
        .route("/api/delete-file/{*filename}", delete(routes::delete_file::<L>))
        .route("/api/open-file/{*filename}", post(routes::open_file::<L>))
        .route("/api/files", get(routes::list_files::<L>))
        // Attachments are local files of any size
        .layer(DefaultBodyLimit::disable())
        .with_state(AppState { api, index_dir })
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(
    api: BoardApi<CommandLauncher>,
    config: &BoardConfig,
    index_dir: Option<PathBuf>,
) -> Result<()> {
    let app = router(Arc::new(api), index_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    let addr = listener.local_addr().context("failed to read bound address")?;
    let url = format!("http://{}", addr);
    info!(url = %url, "board server listening");

    if config.open_browser {
        tokio::task::spawn_blocking(move || {
            if let Err(e) = CommandLauncher::system().launch(OsStr::new(&url)) {
                warn!(url = %url, error = %e, "could not open browser");
            }
        });
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("board server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
