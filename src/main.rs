use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_relay::{AppState, RelayConfig, WEBHOOK_URL_ENV, router};

/// Main entry point for the intake relay
///
/// Serves the care assessment submission relay on port 3000 (configurable via
/// `INTAKE_RELAY_ADDR`).
///
/// # Environment Variables
/// - `INTAKE_RELAY_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CARE_ASSESSMENT_WEBHOOK_URL`: Webhook submissions are forwarded to. Read on every
///   request; if it is missing the relay still starts and reports a configuration error
///   to callers.
/// - `RELAY_WEBHOOK_TIMEOUT_SECS`: Outbound webhook timeout (default: 30)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake_run=info".parse()?)
                .add_directive("intake_relay=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("INTAKE_RELAY_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let config = RelayConfig::from_env()?;
    if let Err(e) = config.webhook_url() {
        tracing::warn!(
            "{} is not usable yet ({}); submissions will fail until it is set",
            WEBHOOK_URL_ENV,
            e
        );
    }

    tracing::info!("++ Starting intake relay on {}", addr);

    let app = router(AppState::new(config)?);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
