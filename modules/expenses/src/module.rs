use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes::{self, RouterOptions};
use crate::config::ExpensesConfig;
use crate::contract::client::ExpensesApi;
use crate::domain::repo::ExpensesRepository;
use crate::domain::service::Service;
use crate::gateways::local::ExpensesLocalClient;
use crate::infra::storage::{migrations::Migrator, FileExpensesRepository, SeaOrmExpensesRepository};

/// The expenses module wired to exactly one storage backend.
#[derive(Clone)]
pub struct ExpensesModule {
    service: Arc<Service>,
    config: ExpensesConfig,
}

impl ExpensesModule {
    /// Wire the domain service to an already constructed repository.
    pub fn from_repository(repo: Arc<dyn ExpensesRepository>, config: ExpensesConfig) -> Self {
        let service = Service::new(repo, (&config).into());
        Self {
            service: Arc::new(service),
            config,
        }
    }

    /// JSON file storage. Never fails: an unusable file starts an empty store.
    pub async fn with_file_storage(path: impl Into<PathBuf>, config: ExpensesConfig) -> Self {
        let repo = FileExpensesRepository::open(path).await;
        info!(path = %repo.path().display(), "Expenses module using file storage");
        Self::from_repository(Arc::new(repo), config)
    }

    /// Database storage. Runs the schema migrations first.
    pub async fn with_database(
        conn: DatabaseConnection,
        config: ExpensesConfig,
    ) -> anyhow::Result<Self> {
        info!("Running expenses database migrations");
        Migrator::up(&conn, None).await?;
        info!("Expenses database migrations completed successfully");

        let repo = SeaOrmExpensesRepository::new(conn);
        Ok(Self::from_repository(Arc::new(repo), config))
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Local in-process client
    pub fn client(&self) -> Arc<dyn ExpensesApi> {
        Arc::new(ExpensesLocalClient::new(self.service.clone()))
    }

    /// The REST router with the full middleware stack.
    pub fn router(&self, timeout: Option<std::time::Duration>, cors_enabled: bool) -> Router {
        let options = RouterOptions {
            timeout,
            cors_enabled,
            body_limit_bytes: self.config.body_limit_bytes,
        };
        routes::build_router(self.service.clone(), &options)
    }
}
