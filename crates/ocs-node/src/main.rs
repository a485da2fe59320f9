//! # On-Chain Secrets Node
//!
//! The node binary: loads configuration, wires the in-process component
//! graph, and serves the RPC surface of spec.md §6 over HTTP/JSON.
//!
//! Grounded on the teacher's `node-runtime::main` entry-point shape
//! (tracing init, config load, run-until-signal) generalized onto
//! `axum` instead of the teacher's bespoke event bus, since this core's
//! external interface is request/response rather than subscription-based.

mod config;
mod error;
mod hex_param;
mod http;
mod wiring;

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = config::NodeConfig::from_env()?;
    config.validate();
    info!(
        roster_size = config.roster_size,
        self_index = config.self_index,
        bind_addr = %config.bind_addr,
        "starting ocs-node"
    );

    let service = wiring::build_service(&config).await?;
    let app = http::router(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
