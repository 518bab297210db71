//! HTTP server binary for parsonnel.
//!
//! A thin shim over the library crate: load configuration from the
//! environment, construct the extractor once, inject it into the router,
//! and serve.

use anyhow::{Context, Result};
use clap::Parser;
use parsonnel::{api, Extractor, ExtractorConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// AI-powered personal-information parser API.
#[derive(Debug, Parser)]
#[command(name = "parsonnel-server", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "PARSER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PARSER_PORT", default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = ExtractorConfig::from_env().context("loading configuration")?;
    if config.vision_api_key.is_none() {
        info!("no vision credential configured; /api/idcard/parse will answer 500");
    }
    let extractor = Arc::new(Extractor::new(config).context("constructing extractor")?);

    let app = api::build_router(extractor);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("parsonnel {} listening on http://{addr}", env!("CARGO_PKG_VERSION"));
    info!("docs: http://{addr}/docs");

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
