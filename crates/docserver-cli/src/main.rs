use clap::Parser;

mod cli;
mod commands;
mod discovery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let level = commands::log_level(&cli)?;
    tracing_subscriber::fmt().with_max_level(level).init();
    commands::run_command(cli).await
}
