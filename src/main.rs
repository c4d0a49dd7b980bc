/// Retail API server binary
use anyhow::Context;
use retail_api::{config::LogFormat, config::ServerConfig, server, AppContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.logging.level, config.logging.format);

    print_banner();

    // Create application context
    let ctx = AppContext::new(config)
        .await
        .context("failed to initialize application")?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(level)
        .unwrap_or_else(|_| EnvFilter::new("retail_api=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn print_banner() {
    println!(
        r#"
    ____       __        _ __   ___    ____  ____
   / __ \___  / /_____ _(_) /  /   |  / __ \/  _/
  / /_/ / _ \/ __/ __ `/ / /  / /| | / /_/ // /
 / _, _/  __/ /_/ /_/ / / /  / ___ |/ ____// /
/_/ |_|\___/\__/\__,_/_/_/  /_/  |_/_/   /___/

        Retail API v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
