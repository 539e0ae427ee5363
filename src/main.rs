use anyhow::{Context, Result};
use home_energy_planner::{api, config, planner, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside development
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = Config::load().context("loading configuration")?;

    if cfg.solar.api_key.is_empty() || cfg.solar.api_key.starts_with("__SET_VIA_ENV") {
        warn!("no solar estimator API key configured; set HEP__SOLAR__API_KEY");
    }

    let app_state = planner::AppState::new(cfg.clone())
        .await
        .context("initializing planner")?;

    let app = api::router(app_state, &cfg);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0; the API will be reachable from the network");
    }

    info!(%addr, "starting home energy planner");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
