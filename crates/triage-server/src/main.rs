use clap::Parser;
use tracing_subscriber::EnvFilter;
use triage_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    triage_server::run(ServerConfig::parse()).await
}
