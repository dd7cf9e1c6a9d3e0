use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod error;
mod prompt;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let settings = match settings::load(&cli.global) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pocketbook={level},engine={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(base_url = %settings.base_url, "settings loaded");

    if let Err(err) = commands::run(cli.command, &settings).await {
        tracing::error!("{err}");
        eprintln!("{}", err.notice());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
