use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use viewtrace::account::UserViewContext;
use viewtrace::config::AppConfig;
use viewtrace::logging::init_logging;
use viewtrace::server::{build_tracer, event_system, load_store, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to read configuration")?;
    init_logging(&config.log_filter).context("failed to initialize logging")?;

    let store = load_store(&config).context("failed to load seed users")?;
    let events = event_system(&config);
    let ctx = Arc::new(UserViewContext::new(store, build_tracer(&config, &events)));

    serve(config.bind, ctx).await.context("server failed")?;

    info!("{} trace events retained at shutdown", events.len());
    Ok(())
}
