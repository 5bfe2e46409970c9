//! Maharitage API Server
//!
//! Serves account, session and contact-form endpoints for the Maharitage
//! heritage site.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maharitage_server::{
    config::{AppConfig, DatabaseConfig, MailConfig},
    db::{create_pool, schema::ensure_schema},
    mail::SmtpMailer,
    routes::build_router,
    services::{AuthService, ContactService},
    state::AppState,
    store::PgUserStore,
};

/// Initialize tracing/logging.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,maharitage_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Maharitage API server"
    );

    let app_config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load app config, using defaults");
        AppConfig::default()
    });

    let db_config = DatabaseConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load database config, using defaults");
        DatabaseConfig::default()
    });

    let mail_config = MailConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load mail config, using defaults");
        MailConfig::default()
    });

    app_config.validate()?;
    if app_config.session_secret.as_deref().unwrap_or_default().is_empty() {
        tracing::warn!("MAHARITAGE_SESSION_SECRET not set, using development secret (debug mode only)");
    }
    if mail_config.contact_recipient.is_none() {
        tracing::warn!("MAIL_CONTACT_RECIPIENT not set, contact form submissions will fail");
    }

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        debug = app_config.debug,
        public_url = %app_config.public_url,
        "Configuration loaded"
    );

    let db_pool = create_pool(&db_config).await?;
    ensure_schema(&db_pool).await?;

    let app_config = Arc::new(app_config);
    let mailer = Arc::new(SmtpMailer::new(&mail_config)?);
    let store = Arc::new(PgUserStore::new(db_pool.clone()));

    let auth_service = AuthService::new(store, mailer.clone(), app_config.clone());
    let contact_service = ContactService::new(mailer, mail_config.contact_recipient.clone());
    let state = AppState::new(db_pool, app_config.clone());

    let app = build_router(state, auth_service, contact_service);

    let addr: SocketAddr = app_config.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
