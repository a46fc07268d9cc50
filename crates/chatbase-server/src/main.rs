use tracing::{info, warn};

use chatbase_server::{WidgetConfig, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatbase_widget=info,chatbase_server=info,tower_http=info".into()),
        )
        .init();

    let config = WidgetConfig::from_env()?;
    let addr = config.addr()?;

    if !config.index_path().is_file() {
        warn!("Widget document {} not found; / and /chat will answer 404", config.index_path().display());
    }

    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Chat widget server running at http://localhost:{}", config.port);
    info!("Serving {} from {}", config.index, config.root.display());
    info!("Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.port))
        .await?;

    info!("Chat widget server on port {} stopped", config.port);
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix, whichever arrives first.
async fn shutdown_signal(port: u16) {
    let signal = wait_for_stop().await;
    info!("{} received, draining widget connections on port {}", signal, port);
}

async fn wait_for_stop() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => tokio::select! {
                _ = tokio::signal::ctrl_c() => "Ctrl+C",
                _ = sigterm.recv() => "SIGTERM",
            },
            Err(e) => {
                warn!("SIGTERM handler unavailable ({}), stopping on Ctrl+C only", e);
                let _ = tokio::signal::ctrl_c().await;
                "Ctrl+C"
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        "Ctrl+C"
    }
}
