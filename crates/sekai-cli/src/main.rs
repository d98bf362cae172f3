#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use sekai_server::handler::routes;
use sekai_server::middleware::{
    RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt, RouterSecurityExt,
};
use sekai_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};
use crate::server::ServerError;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "sekai_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "sekai_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "sekai_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    let server_error = error.downcast_ref::<ServerError>();
    let code = server_error.map(ServerError::error_code);
    let suggestion = server_error.and_then(ServerError::suggestion);

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            code = code.unwrap_or_default(),
            "Application terminated with error"
        );

        if let Some(suggestion) = suggestion {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                suggestion,
                "Recovery suggestion"
            );
        }
    } else {
        eprintln!("Error: {error:#}");
        if let Some(suggestion) = suggestion {
            eprintln!("Hint: {suggestion}");
        }
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = ServiceState::from_config(&cli.service).context("failed to create service state")?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_state::<()>(state)
        .with_open_api(middleware.openapi.clone())
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
