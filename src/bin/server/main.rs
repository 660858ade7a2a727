#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! HTTP API relaying form submissions to the target mailbox

use anyhow::Result;
use clap::Parser;
use form_relay::infrastructure::{
    config::{load_environment, RelayConfig},
    http::{state::AppState, HttpServer, HttpServerConfig},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The relay configuration
    #[clap(flatten)]
    pub relay: RelayConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = load_environment() {
        eprintln!("{e:#}");

        return Err(e);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!(
        relay = %format!("{}:{}", args.relay.smtp.host, args.relay.smtp.port),
        target = %args.relay.target,
        "starting form relay"
    );

    let state = AppState::new(args.relay.submission_service());

    HttpServer::new(state, &args.server).run().await
}
