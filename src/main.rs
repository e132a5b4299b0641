//! PDF API Adapter - Entry point
//!
//! MCP server in front of a remote PDF processing API.

use pdf_api_adapter::{run_server, AdapterConfig, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_api_adapter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let adapter = AdapterConfig::from_env()?;
    let resource_dirs = std::env::var_os("PDF_API_RESOURCE_DIRS")
        .map(|dirs| {
            std::env::split_paths(&dirs)
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(|dir| dir.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    tracing::info!(config = ?adapter, ?resource_dirs, "Starting PDF API server");

    run_server(ServerConfig {
        adapter,
        resource_dirs,
    })
    .await
}
