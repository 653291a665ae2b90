use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::{self, MuxConfig};
use crate::errors::MuxError;

pub async fn handle_serve(args: ServeArgs) -> Result<(), MuxError> {
    let mut config = config::load_config(args.config.as_deref().map(Path::new)).await?;
    apply_overrides(&mut config, &args);
    config::parser::validate_conflicts(&config)?;

    let state = api::create_app_state(&config)?;
    for provider in state.router.providers() {
        let available = state.router.resolver().resolve(None, provider).is_some();
        info!(
            provider = %provider.name,
            kind = %provider.kind,
            priority = provider.priority,
            model = provider.model(),
            env_credential = available,
            "Provider in chain"
        );
    }
    let app = api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(timeout_secs = config.timeout_secs, "Listening on {}", addr);

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received, draining in-flight requests");
        trigger.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| MuxError::Internal(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

fn apply_overrides(config: &mut MuxConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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
