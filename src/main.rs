use clap::Parser;
use dotenvy::dotenv;
use expense_tracker::{
    cli::{self, AppContext, Cli},
    config::{database, settings},
    errors::Result,
};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Tracing first so config and database setup are logged
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal, env vars can be set externally
    dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Command failed: {e}");
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = settings::load_config_or_default(&cli.config)?;
    let url = config.database_url(cli.database_url.as_deref());

    let db = database::open(&url).await?;
    database::seed_categories(&db, &config.categories).await?;

    let today = chrono::Local::now().date_naive();
    let ctx = AppContext::new(db, config, today);
    cli::run(&ctx, cli.command).await
}
