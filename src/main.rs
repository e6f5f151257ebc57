//! careportal server binary
//!
//! Reads `CAREPORTAL_CONFIG` (YAML) and `CAREPORTAL_LISTEN`, then serves the
//! portal API until SIGTERM or Ctrl+C.

use careportal::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PortalConfig::from_env()?;
    tracing::info!(
        listen = %config.server.listen,
        enforce_doctor_id_format = config.validation.enforce_doctor_id_format,
        access_overrides = config.access.len(),
        "starting careportal v{}",
        env!("CARGO_PKG_VERSION")
    );

    ServerBuilder::new().with_config(config).serve().await
}
