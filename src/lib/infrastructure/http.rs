//! HTTP Server

use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use anyhow::Context;
use axum::{
    extract::Request,
    routing::{get, post},
    Json, Router,
};
use axum_server::Handle;
use clap::Parser;
use state::AppState;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{debug, info, info_span};
use utoipa::OpenApi;

use crate::domain::submissions::SubmissionService;

mod errors;
mod handlers;
mod open_api;
pub mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The address to listen on
    #[arg(long = "http-host", env = "HTTP_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// The port to listen on
    #[arg(short, long = "http-port", env = "HTTP_PORT", default_value = "8000")]
    pub port: u16,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    address: SocketAddr,
}

impl HttpServer {
    /// Returns a new HTTP server for the address in `config`.
    pub fn new<S: SubmissionService>(state: AppState<S>, config: &HttpServerConfig) -> Self {
        Self {
            router: router(state),
            address: SocketAddr::new(config.host, config.port),
        }
    }

    /// Runs the HTTP server until Ctrl+C or SIGTERM.
    #[mutants::skip]
    pub async fn run(self) -> anyhow::Result<()> {
        info!("HTTP server listening on {}", self.address);

        let handle = Handle::new();

        let server = axum_server::bind(self.address)
            .handle(handle.clone())
            .serve(self.router.into_make_service());

        tokio::select! {
            result = server => result.with_context(|| format!("failed to serve on {}", self.address))?,
            _ = shutdown_signal(Some(handle)) => {
                info!("Shutting down HTTP server");
            }
        }

        Ok(())
    }
}

/// Create the application's router
pub fn router<S: SubmissionService>(state: AppState<S>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .route("/api/send-mail", post(handlers::send_mail::handler::<S>))
        .route("/api/uptime", get(handlers::uptime::handler::<S>))
        .route("/api/openapi.json", get(Json(open_api::ApiDocs::openapi())))
        .layer(CatchPanicLayer::custom(handlers::panic_handler))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::very_permissive())
        .layer(trace_layer)
        .with_state(state)
}

#[mutants::skip]
async fn shutdown_signal(handle: Option<Handle>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    if let Some(handle) = handle {
        debug!("shutting down gracefully");
        handle.graceful_shutdown(Some(Duration::from_secs(10)));
    }
}
