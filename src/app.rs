/*
 * Responsibility
 * - load Config -> build the gate -> assemble the Router
 * - apply middleware (group gate on /api/v1, http layers everywhere)
 * - start with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, v1::handlers::health::health};
use crate::authz::GroupGate;
use crate::config::Config;
use crate::middleware;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Denials are logged at warn, allows at debug:
    // RUST_LOG=info,groups_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing; stderr may be hidden depending on
        // how the process is launched.
        tracing::error!(?info, "panic");

        // Development: fail fast so a broken gate is noticed immediately.
        // Production: default behavior, the server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let gate = GroupGate::new(config.gate_name.clone(), config.gate.clone())
        .context("invalid group gate configuration")?;
    let app = build_router(Arc::new(gate), &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(gate: Arc<GroupGate>, config: &Config) -> Router {
    let v1 = middleware::authz::apply(api::v1::routes(), gate);

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1);

    middleware::http::apply(router, config)
}
