use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Serve the disaster-response classifier dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "triage-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "TRIAGE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "TRIAGE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database with the labeled messages
    #[arg(long, env = "TRIAGE_DATABASE", default_value = "data/DisasterResponse.db")]
    pub database: PathBuf,

    /// Table holding the labeled messages
    #[arg(long, env = "TRIAGE_TABLE", default_value = triage_core::DEFAULT_TABLE)]
    pub table: String,

    /// Trained model artifact
    #[arg(long, env = "TRIAGE_MODEL", default_value = "models/classifier.json")]
    pub model: PathBuf,
}

impl ServerConfig {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {addr}: {e}"))
    }
}
