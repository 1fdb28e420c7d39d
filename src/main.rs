use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;

use taskwatch::config::Config;
use taskwatch::scanner::scan_vault;
use taskwatch::{monitor, telegram};

#[derive(Parser)]
#[command(name = "taskwatch", version, about = "Markdown vault task monitor with Telegram reminders")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the vault once, report task counts, and exit
    Scan,
    /// Build and send one task summary, then exit
    Summary,
    /// Run continuous monitoring (default)
    Monitor,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Command::Monitor) {
        Command::Scan => {
            let records = scan_vault(&config);
            let pending = records
                .iter()
                .filter(|t| t.status == taskwatch::types::TaskStatus::Todo)
                .count();
            log::info!(
                "Scan finished: {} task(s), {} pending",
                records.len(),
                pending
            );
            ExitCode::SUCCESS
        }
        Command::Summary => {
            let records = scan_vault(&config);
            telegram::send_task_summary(&config, &records).await;
            ExitCode::SUCCESS
        }
        Command::Monitor => match monitor::run(config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Monitor failed to start: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
