use std::path::Path;

use anyhow::{anyhow, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use catalog_application::queries::item_queries;
use catalog_application::AppState;
use catalog_infrastructure::validate_base_url;
use catalog_interfaces_http::build_router;

use crate::context::AppContext;

fn build_router_with_layers(state: AppState) -> Router {
    build_router(state.clone())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(
            usize::try_from(state.config.max_body_bytes).unwrap_or(usize::MAX),
        ))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            state.config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_standalone(config_path: Option<&Path>) -> Result<()> {
    let context = AppContext::new(config_path).await?;
    let state = context.state;
    if state.config.api_token.is_none() {
        warn!("api_token is not set, catalog endpoints are open");
    }

    let app = build_router_with_layers(state.clone());
    let addr: std::net::SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Renders the stored catalog once and writes it to `output`, or to stdout
/// when no output path is given.
pub async fn run_export(
    config_path: Option<&Path>,
    base_url: &str,
    output: Option<&Path>,
) -> Result<()> {
    let context = AppContext::new(config_path).await?;
    export_to(&context.state, base_url, output).await
}

async fn export_to(state: &AppState, base_url: &str, output: Option<&Path>) -> Result<()> {
    validate_base_url(base_url).map_err(|err| anyhow!("invalid --base-url: {}", err))?;
    let base_url = base_url.trim().trim_end_matches('/');
    let document = item_queries::export_items(state, base_url).await?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            tokio::fs::write(path, document.body.as_bytes()).await?;
            info!(
                path = %path.display(),
                emitted = document.emitted,
                skipped = document.skipped.len(),
                sha256 = %document.checksum_sha256,
                "items file written"
            );
        }
        None => {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(document.body.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("sigterm handler unavailable: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
