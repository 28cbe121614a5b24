//! Offer aggregator server.

use anyhow::{Context, Result};
use clap::Parser;
use offer_aggregator::api::rest::{AppState, create_router};
use offer_aggregator::application::services::{
    ApplicationService, ReconciliationLoop, SubmissionFanout, SubmissionReconciler,
};
use offer_aggregator::infrastructure::banks::BankRegistry;
use offer_aggregator::infrastructure::config::AppConfig;
use offer_aggregator::infrastructure::logging;
use offer_aggregator::infrastructure::persistence::{
    ApplicationRepository, BankSubmissionRepository, InMemoryStore, OfferRepository,
    PostgresStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "offer-aggregator")]
#[command(about = "Aggregates financing offers from multiple banks")]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, env = "AGGREGATOR_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct Repositories {
    applications: Arc<dyn ApplicationRepository>,
    submissions: Arc<dyn BankSubmissionRepository>,
    offers: Arc<dyn OfferRepository>,
}

impl Repositories {
    fn from_store<S>(store: S) -> Self
    where
        S: ApplicationRepository + BankSubmissionRepository + OfferRepository + Clone + 'static,
    {
        Self {
            applications: Arc::new(store.clone()),
            submissions: Arc::new(store.clone()),
            offers: Arc::new(store),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    logging::init(&config.logging).context("failed to initialize logging")?;

    let registry = BankRegistry::from_config(&config.banks).context("invalid bank configuration")?;
    tracing::info!(banks = ?registry.names(), "banks configured");

    let repositories = connect_store(&config).await?;

    let application_service = ApplicationService::new(
        Arc::clone(&repositories.applications),
        Arc::clone(&repositories.submissions),
        SubmissionFanout::new(registry.clone()),
    );
    let reconciler = SubmissionReconciler::new(
        repositories.applications,
        repositories.submissions,
        repositories.offers,
        registry,
    );
    let reconciliation = ReconciliationLoop::new(Arc::new(reconciler), config.reconciliation.interval());
    reconciliation.start().await;

    let router = create_router(Arc::new(AppState {
        application_service: application_service.clone(),
    }));
    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, "HTTP server listening");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    reconciliation.stop().await;
    tracing::info!(in_flight = application_service.in_flight(), "waiting for background processing");
    application_service.drain().await;
    tracing::info!("shutdown complete");

    served.context("HTTP server failed")
}

async fn connect_store(config: &AppConfig) -> Result<Repositories> {
    match config.database.url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            let store = PostgresStore::connect(url, config.database.max_connections)
                .await
                .context("failed to connect to database")?;
            store.migrate().await.context("failed to run migrations")?;
            tracing::info!("using PostgreSQL store");
            Ok(Repositories::from_store(store))
        }
        None => {
            tracing::warn!("no database url configured, using in-memory store");
            Ok(Repositories::from_store(InMemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
