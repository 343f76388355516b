mod command;
mod config;

use std::{env, process, str::FromStr, sync::Arc};

use command::{Command, CommandError, USAGE};
use config::{AppConfig, ConfigError, Environment};
use log::info;
use points_ledger::{PointsController, PointsError};
use rewards_service::{PointsService, PointsUseCases};
use serde::Serialize;
use thiserror::Error;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run().await {
        eprintln!("gkash failed: {err}");
        if matches!(err, AppError::Usage | AppError::Command(_)) {
            eprintln!("{USAGE}");
        }
        process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let mut args = env::args().skip(1);
    let env = Environment::from_str(&args.next().ok_or(AppError::Usage)?)?;
    let rest: Vec<String> = args.collect();
    let command = Command::parse(&rest)?;

    let config = AppConfig::load(env)?;
    let (controller, _) = PointsController::bootstrap(config.ledger.clone())?;
    info!(
        "gkash points ledger ready in {} mode (users={}, state_dir={:?}, latency={:?})",
        config.env_label(),
        controller.user_count(),
        config.ledger.state_dir(),
        config.service.simulated_latency
    );
    if command.is_mutation() {
        info!("executing {command:?}");
    }

    let service = PointsService::new(Arc::new(controller), config.service.clone());
    let output = execute(&service, command).await?;
    println!("{output}");
    Ok(())
}

async fn execute(service: &PointsService, command: Command) -> Result<String, AppError> {
    match command {
        Command::Balance { user_id } => render(&service.get_user_points(&user_id).await),
        Command::Complete {
            user_id,
            module_id,
            score,
        } => render(&service.complete_module(&user_id, &module_id, score).await),
        Command::Purchase { user_id, offer_id } => {
            render(&service.purchase_stock(&user_id, &offer_id).await)
        }
        Command::History { user_id } => render(&service.get_points_history(&user_id).await),
        Command::Progress { user_id } => render(&service.get_learning_progress(&user_id).await),
        Command::Purchases { user_id } => {
            render(&service.get_user_stock_purchases(&user_id).await)
        }
        Command::Portfolio { user_id } => {
            render(&service.controller().portfolio_summary(&user_id))
        }
        Command::Audit { user_id } => render(&service.controller().audit_user(&user_id)),
        Command::Rewards { category: None } => render(&service.get_available_rewards().await),
        Command::Rewards {
            category: Some(category),
        } => render(&service.controller().rewards_by_category(&category)),
        Command::Stocks => render(&service.get_available_stocks().await),
    }
}

fn render<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[derive(Debug, Error)]
enum AppError {
    #[error("missing environment argument")]
    Usage,
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] PointsError),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}
