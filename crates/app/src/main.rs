//! Fortuna command-line entry point.

use clap::Parser;
use fortuna::App;
use fortuna::cli::Cli;
use fortuna::settings::Settings;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so command output stays parseable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(path) = cli.credentials {
        settings.credentials_path = Some(path);
    }

    tracing::debug!(
        base_url = %settings.base_url,
        "starting Fortuna v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = App::new(&settings)?;
    let output = app.run(cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
