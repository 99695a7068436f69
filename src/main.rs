use clap::Parser;
use ntfy_channel::cli::{Cli, execute_command};
use ntfy_channel::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logger(cli.logger_config())?;

    if let Err(e) = execute_command(&cli).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
