//! Server state

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtService, PermissionGate};
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{Mailer, MockMailer, ScheduleWorker};
use crate::utils::AppError;

/// Shared application state, cheaply cloned into every handler.
///
/// The permission gate is injected here rather than read from a global,
/// so tests can run with a custom grant table.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    jwt_service: Arc<JwtService>,
    gate: Arc<PermissionGate>,
    mailer: Arc<dyn Mailer>,
}

impl ServerState {
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        gate: Arc<PermissionGate>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            gate,
            mailer,
        }
    }

    /// Open the database and assemble the full state from config.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_service = DbService::new(&config.database_dir().to_string_lossy()).await?;
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let gate = Arc::new(PermissionGate::default());
        let mailer: Arc<dyn Mailer> = Arc::new(MockMailer);

        Ok(Self::new(
            config.clone(),
            db_service.db,
            jwt_service,
            gate,
            mailer,
        ))
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn mailer(&self) -> Arc<dyn Mailer> {
        self.mailer.clone()
    }

    /// Spawn long-running background tasks: the scheduled-notification
    /// worker.
    pub fn start_background_tasks(&self) {
        let worker = ScheduleWorker::new(
            self.db.clone(),
            self.mailer.clone(),
            self.config.schedule_poll_secs,
        );
        tokio::spawn(worker.run());
    }
}
