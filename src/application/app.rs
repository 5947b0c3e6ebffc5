use crate::config::{Settings, StorageBackend};
use crate::infrastructure::{log_messages, InMemoryStore, PostgresStore};
use crate::server::{create_router, AppState};
use crate::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Main application struct that coordinates all components
pub struct Application {
    settings: Settings,
    state: AppState,
}

impl Application {
    /// Load settings from the environment and build the application
    pub async fn new() -> Result<Self> {
        Self::build(Settings::new()?).await
    }

    #[instrument(skip(settings), fields(backend = ?settings.database.backend))]
    pub async fn build(settings: Settings) -> Result<Self> {
        let state = match settings.database.backend {
            StorageBackend::Postgres => {
                info!("{}", log_messages::application::CONNECTING_TO_DATABASE);
                let store = PostgresStore::connect(&settings.database).await?;
                if settings.database.run_migrations {
                    store.run_migrations().await?;
                }
                AppState::from_store(Arc::new(store))
            }
            StorageBackend::Memory => {
                warn!("{}", log_messages::application::USING_IN_MEMORY_STORE);
                AppState::from_store(Arc::new(InMemoryStore::new()))
            }
        };

        Ok(Self { settings, state })
    }

    pub fn router(&self) -> Router {
        create_router(
            self.state.clone(),
            self.settings.application.max_body_bytes,
        )
    }

    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.settings.bind_address()).await?;
        info!(
            address = %listener.local_addr()?,
            environment = %self.settings.application.environment,
            "{}",
            log_messages::application::LISTENING
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("{}", log_messages::application::STOPPED);
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("{}", log_messages::application::SHUTTING_DOWN);
}
