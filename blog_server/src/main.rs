//! Blog API server: loads settings, prepares the store, mounts the router and serves until signalled.

use blog_backend::{apply_migrations, app, config, load_from_env, seed_admin, store, AppState};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// In-flight requests get this long to finish once a shutdown signal arrives.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter())),
        )
        .init();
    info!(environment = settings.environment.as_str(), "starting blog server");
    if config::uses_default_secret(&settings) {
        warn!("JWT_SECRET is the built-in default; set a real secret in production");
    }

    let pool = store::connect(&settings.database).await?;
    apply_migrations(&pool).await?;
    if let Err(e) = seed_admin(&pool, &settings.admin).await {
        warn!(error = %e, "could not create default admin user");
    }

    let addr = settings.bind_addr()?;
    let state = AppState::new(pool.clone(), settings);
    let router = app(state);

    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            pool.close().await;
            return Ok(res??);
        }
        () = shutdown_signal() => {}
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(Ok(Ok(()))) => info!("server shutdown complete"),
        Ok(Ok(Err(e))) => warn!(error = %e, "server exited with error"),
        Ok(Err(e)) => warn!(error = %e, "server task failed"),
        Err(_) => warn!("in-flight requests did not finish within the grace period"),
    }
    pool.close().await;
    Ok(())
}
