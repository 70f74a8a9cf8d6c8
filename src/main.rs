//! One Drink Today server binary.

use anyhow::{Context, Result};
use tracing::info;

use one_drink_today::config::Settings;
use one_drink_today::startup::Application;
use one_drink_today::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let settings = Settings::load().context("failed to load configuration")?;
    info!(
        environment = %settings.environment,
        addr = %settings.server_addr(),
        version = env!("CARGO_PKG_VERSION"),
        "Starting One Drink Today"
    );

    let application = Application::build(settings).await?;
    info!(addr = %application.local_addr()?, "Accepting connections");

    application.run_until_stopped().await
}
