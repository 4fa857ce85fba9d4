//! Main integration module for the anomaly prediction server
//!
//! This module wires the configuration, the model store, the prediction
//! service and the HTTP API together.

use std::future::Future;
use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use api_gateway::{AppState, RestApi};
use inference_engine::PredictionService;
use model_manager::ModelStore;
use service_config::ServiceConfig;

/// Anomaly prediction server
pub struct AnomalyServer {
    /// Effective configuration
    config: ServiceConfig,

    /// Prediction service shared by every request
    service: PredictionService,
}

impl AnomalyServer {
    /// Creates a new server, loading the model artifact once
    ///
    /// A missing or corrupt artifact does not fail startup: the server runs
    /// with the model unavailable and reports it on every prediction.
    pub async fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;

        info!("Initializing anomaly prediction server");
        info!("Current working directory: {:?}", std::env::current_dir().ok());

        let store = ModelStore::open(config.model.path.clone()).await;
        if !store.is_loaded() {
            warn!("Serving without a model; predictions will report the model as unavailable");
        }

        let service = PredictionService::new(Arc::new(store))
            .with_default_mode(config.validation.mode);

        Ok(Self { config, service })
    }

    /// Effective configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Prediction service
    pub fn service(&self) -> &PredictionService {
        &self.service
    }

    /// Serves the API until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let api = RestApi::new(
            &self.config.bind_address(),
            AppState::new(self.service.clone()),
        )?;

        info!(
            model_loaded = self.service.store().is_loaded(),
            validation = %self.service.default_mode(),
            "Starting API on {}", api.addr()
        );

        api.serve(shutdown).await
    }
}

/// Resolves once ctrl-c is received
pub async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires
///
/// If the handler cannot be installed the error is logged and the future
/// never resolves, so the server keeps running.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            error!("Failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await
        }
    }
}
