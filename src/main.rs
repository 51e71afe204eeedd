use std::fs;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use temblor::app::AppContext;
use temblor::cli::{commands, Cli, Commands};
use temblor::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Watch);

    init_tracing(matches!(command, Commands::Watch))?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default configuration");
        Config::default()
    });

    let ctx = Arc::new(AppContext::new(config, cli.quiet).await);

    match command {
        Commands::Watch => {
            temblor::tui::run(ctx).await?;
        }
        Commands::Poll { source } => {
            commands::poll(&ctx, source.as_deref()).await?;
        }
        Commands::Sources => {
            commands::sources();
        }
        Commands::TestAlarm => {
            commands::test_alarm(&ctx);
        }
    }

    Ok(())
}

/// While the TUI owns the terminal, logs go to a file instead of stderr.
fn init_tracing(to_file: bool) -> anyhow::Result<()> {
    if to_file {
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("temblor");
        fs::create_dir_all(&log_dir)?;
        let file = fs::File::create(log_dir.join("temblor.log"))?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_ansi(false))
            .with(EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    Ok(())
}
