//! scanhint command line entry point

mod args;
mod commands;
mod config;
mod logging;
mod report;

use anyhow::Result;
use args::{Cli, Command};
use clap::Parser;
use config::Config;
use logging::LoggingConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    logging::init(LoggingConfig::from_settings(
        &config.logging,
        cli.log_filter.as_deref(),
    ))?;
    config.apply_connection_args(&cli.connection);

    match cli.command {
        Command::ExplainFile(args) => commands::explain_file(&args),
        Command::Analyze(args) => {
            let conn = commands::connect(&config.connection).await?;
            let result = commands::analyze(conn.as_ref(), &args).await;
            commands::close(conn.as_ref()).await;
            result
        }
        Command::Maintain(args) => {
            config.apply_maintain_args(&args)?;
            let conn = commands::connect(&config.connection).await?;
            let result = commands::maintain(conn.clone(), &config.maintenance).await;
            commands::close(conn.as_ref()).await;
            result
        }
        Command::Run(args) => {
            config.apply_maintain_args(&args.maintain)?;
            let conn = commands::connect(&config.connection).await?;
            let result = match commands::analyze(conn.as_ref(), &args.analyze).await {
                Ok(()) => {
                    println!();
                    commands::maintain(conn.clone(), &config.maintenance).await
                }
                Err(e) => Err(e),
            };
            commands::close(conn.as_ref()).await;
            result
        }
    }
}
