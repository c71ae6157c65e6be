//! SMSGate webhook receiver.
//!
//! This binary:
//! 1. Registers `WEBHOOK_URL` with the SMS gateway for `sms:received`
//! 2. Serves `POST /webhook/sms-received`, over TLS when a cert and key are set
//! 3. Deregisters the webhook after graceful shutdown

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use smsgate::{router, AppState, Config, WebhookLifecycle};

/// How long in-flight requests get to finish once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv().ok();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(dotenv_loaded = dotenv.is_some(), "webhook_server_starting");

    // Load configuration
    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        api_url = %config.api_url,
        port = config.port,
        credentials_configured = config.credentials().is_some(),
        webhook_url = ?config.webhook_url,
        signature_verification = config.signing_secret().is_some(),
        tolerance_secs = config.signature_tolerance_secs,
        tls = config.tls().is_some(),
        "config_loaded"
    );

    if config.signing_secret().is_none() {
        warn!("WEBHOOK_SECRET is not set: signatures will NOT be verified (insecure)");
    }

    // Registration must succeed before any traffic is accepted
    let mut lifecycle = WebhookLifecycle::from_config(&config)?;
    lifecycle.register().await?;

    let app = router(AppState::new(config.clone()));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let served = match config.tls() {
        Some((cert, key)) => serve_tls(app, addr, cert, key).await,
        None => serve_plain(app, addr).await,
    };

    // Deregister even if the server failed after registration
    lifecycle.deregister().await;

    served?;

    info!("webhook_server_shutdown_complete");

    Ok(())
}

async fn serve_plain(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, tls = false, "webhook_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn serve_tls(
    app: Router,
    addr: SocketAddr,
    cert: std::path::PathBuf,
    key: std::path::PathBuf,
) -> Result<()> {
    // reqwest already links ring; make it the process-wide provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let tls = RustlsConfig::from_pem_file(&cert, &key)
        .await
        .with_context(|| format!("Failed to load TLS cert {} / key {}", cert.display(), key.display()))?;

    let handle = Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal().await;
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    info!(address = %addr, tls = true, "webhook_server_listening");

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .context("Server error")
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
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
                warn!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("webhook_server_shutting_down");
}
