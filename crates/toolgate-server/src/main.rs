use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use toolgate_core::{GatewayBuilder, GatewayConfig};
use toolgate_server::{init_tracing, router};

/// JSON gateway over search, weather, network and lookup providers.
#[derive(Debug, Parser)]
#[command(name = "toolgate", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "TOOLGATE_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3100)]
    port: u16,

    /// Emit logs as JSON lines.
    #[arg(long, env = "TOOLGATE_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = GatewayConfig::from_env();
    tracing::info!(?config, "configuration loaded");
    let gateway = Arc::new(
        GatewayBuilder::new(config)
            .build()
            .context("failed to build gateway")?,
    );

    let addr = SocketAddr::new(cli.bind, cli.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "toolgate listening; endpoint list at /api/endpoints");

    axum::serve(
        listener,
        router(gateway).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for ctrl-c");
    }
}
