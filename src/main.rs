use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};

use stockpilot as app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = app::config::load_config().context("failed to load configuration")?;
    app::config::init_tracing(&cfg.log_level, cfg.log_json);

    // Init events
    let (event_sender, event_rx) = app::events::EventSender::channel(cfg.event_channel_capacity);
    tokio::spawn(app::events::process_events(event_rx));

    let runtime = app::bootstrap(&cfg, event_sender)
        .await
        .context("failed to initialize services")?;

    let state = app::AppState::new(
        runtime.ctx.clone(),
        Some(runtime.db.clone()),
        cfg.dev_endpoints_enabled(),
    );

    if cfg.seed_demo_data {
        match state.seeder.seed_if_empty().await {
            Ok(Some(summary)) => info!(?summary, "demo data loaded"),
            Ok(None) => {}
            Err(e) => warn!("Demo data seeding failed: {}", e),
        }
    }
    if state.dev_endpoints_enabled {
        warn!("Development endpoints are enabled");
    }

    let app = app::router(state);

    // Bind and serve
    let addr = cfg.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("StockPilot listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
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
    info!("Shutdown signal received");
}
