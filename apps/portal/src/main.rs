use clap::Parser;
use dotenvy::dotenv;
use tracing::error;

use alasr_portal::adapters::cli::{Cli, run};
use alasr_portal::infra::{
    config::AppConfig,
    setup::{init_app, init_tracing},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    init_tracing(&config);

    let ctx = init_app(config)?;

    if let Err(e) = run(cli, &ctx).await {
        error!(code = %e.code(), error = %e, "Command failed");
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
