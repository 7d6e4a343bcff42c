use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use sahiloan_core::config::{AppConfig, ConfigError, LoadOptions, LogFormat};
use sahiloan_db::repositories::{
    OfferRepository, RequestRepository, SqlOfferRepository, SqlRequestRepository,
};
use sahiloan_db::{connect, migrations, DbPool};

use crate::gateway::ProfileGateway;
use crate::ledger::RequestLedger;
use crate::matching::MatchingService;

/// The wired engine handed to the dialogue layer: shared pool, matching
/// service, and request ledger over the configured store.
pub struct Engine {
    pub config: AppConfig,
    pub pool: DbPool,
    pub matching: MatchingService,
    pub ledger: RequestLedger,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub fn init_logging(config: &AppConfig) {
    let level = config.logging.level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(level).json().init();
        }
    }
}

pub async fn bootstrap(
    options: LoadOptions,
    profiles: Arc<dyn ProfileGateway>,
) -> Result<Engine, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config, profiles).await
}

pub async fn bootstrap_with_config(
    config: AppConfig,
    profiles: Arc<dyn ProfileGateway>,
) -> Result<Engine, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting engine bootstrap");

    let pool = connect(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let offers: Arc<dyn OfferRepository> = Arc::new(SqlOfferRepository::new(pool.clone()));
    let requests: Arc<dyn RequestRepository> = Arc::new(SqlRequestRepository::new(pool.clone()));

    Ok(Engine {
        matching: MatchingService::new(offers),
        ledger: RequestLedger::new(requests, profiles),
        config,
        pool,
    })
}
