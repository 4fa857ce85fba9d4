use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use anomaly_server::{shutdown_signal, AnomalyServer};
use service_config::ServiceConfig;

/// Global temperature anomaly prediction API
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file, used instead of ANOMALY_CONFIG; ANOMALY__* variables still apply
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model artifact location
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Bind address (IP)
    #[arg(long)]
    host: Option<String>,

    /// Listening port
    #[arg(short, long)]
    port: Option<u16>,
}

impl Cli {
    fn load_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::load_from(Some(path.as_path()))?,
            None => ServiceConfig::load()?,
        };

        if let Some(model) = &self.model {
            config.model.path = model.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    logging::init(config.logging.level, config.logging.format);

    let server = AnomalyServer::new(config).await?;
    server.run(shutdown_signal()).await
}
