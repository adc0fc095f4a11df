use anyhow::{Context, Result};
use chatd::core::config::Config;
use chatd::core::routes::build_router;
use chatd::core::startup::{bind_listeners, spawn_rate_limit_cleanup, Listeners};
use chatd::core::state::AppState;
use chatd::core::tracing_init::init_tracing;
use chatd::relay::server::DatagramRelay;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = Config::from_file(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        Copy config.example.toml to config.toml and adjust the values.",
        config_path.display()
    ))?;

    init_tracing(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        http_port = config.server.http_port,
        udp_port = config.server.udp_port,
        num_threads = config.server.num_threads,
        max_datagram_size = config.server.max_datagram_size,
        log_level = %config.logging.level,
        "Chat server starting"
    );

    let Listeners { http: http_listener, udp: udp_socket } = bind_listeners(&config.server).await?;

    let state = Arc::new(AppState::new(config));

    spawn_rate_limit_cleanup(
        Arc::clone(&state.rate_limiter),
        state.config.security.rate_limit_cleanup_interval,
    );

    let app = build_router(Arc::clone(&state)).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        ),
    );

    let http = tokio::spawn(async move {
        axum::serve(http_listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")
    });

    let relay = DatagramRelay::new(udp_socket, Arc::clone(&state));
    let udp = tokio::spawn(relay.run());

    info!("Chat server started, waiting for shutdown signal");

    // The relay loop only ends on a panic; HTTP ends on the shutdown signal
    tokio::select! {
        result = http => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "HTTP server failed"),
                Err(e) => error!(error = %e, "HTTP server task failed"),
            }
        }
        result = udp => {
            if let Err(e) = result {
                error!(error = %e, "Datagram relay task failed");
            }
        }
    }

    info!(
        registered_users = state.registry.len(),
        online_users = state.registry.online_len(),
        "Shutting down"
    );

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
